use crate::analytics::EnrollmentRecord;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Canonical destination of one spreadsheet column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Field {
    UnitCode,
    BranchCode,
    BranchName,
    Period,
    Course,
    Qualification,
    StudentId,
    StudentName,
    NationalId,
    Email,
    PostalCode,
    Street,
    Number,
    District,
    Phone1,
    Phone2,
    EnrollmentDate,
    AcquisitionFlag,
    AdmissionType,
    Shift,
    AcademicTerm,
    Status,
    ClassCode,
    CampusCode,
    Campus,
    City,
    Modality,
}

impl Field {
    pub(crate) fn assign(self, record: &mut EnrollmentRecord, value: String) {
        match self {
            Field::UnitCode => record.unit_code = value,
            Field::BranchCode => record.branch_code = value,
            Field::BranchName => record.branch_name = value,
            Field::Period => record.period = value,
            Field::Course => record.course = value,
            Field::Qualification => record.qualification = value,
            Field::StudentId => record.student_id = value,
            Field::StudentName => record.student_name = value,
            Field::NationalId => record.national_id = value,
            Field::Email => record.email = value,
            Field::PostalCode => record.postal_code = value,
            Field::Street => record.street = value,
            Field::Number => record.number = value,
            Field::District => record.district = value,
            Field::Phone1 => record.phone1 = value,
            Field::Phone2 => record.phone2 = value,
            Field::EnrollmentDate => record.enrollment_date = value,
            Field::AcquisitionFlag => record.acquisition_flag = value,
            Field::AdmissionType => record.admission_type = value,
            Field::Shift => record.shift = value,
            Field::AcademicTerm => record.academic_term = value,
            Field::Status => record.status = value,
            Field::ClassCode => record.class_code = value,
            Field::CampusCode => record.campus_code = value,
            Field::Campus => record.campus = value,
            Field::City => record.city = value,
            Field::Modality => record.modality = value,
        }
    }

    /// Column name shown to users in validation errors.
    pub(crate) const fn column_label(self) -> &'static str {
        match self {
            Field::UnitCode => "CODCOLIGADA",
            Field::BranchCode => "CODFILIAL",
            Field::BranchName => "FILIAL",
            Field::Period => "SEMESTRE",
            Field::Course => "CURSO",
            Field::Qualification => "HABILITACAO",
            Field::StudentId => "RA",
            Field::StudentName => "ALUNO",
            Field::NationalId => "CPF",
            Field::Email => "EMAIL",
            Field::PostalCode => "CEP",
            Field::Street => "RUA",
            Field::Number => "NUMERO",
            Field::District => "BAIRRO",
            Field::Phone1 => "TELEFONE1",
            Field::Phone2 => "TELEFONE2",
            Field::EnrollmentDate => "DTMATRICULA",
            Field::AcquisitionFlag => "QTDCAPTACAO",
            Field::AdmissionType => "TIPOINGRESSO",
            Field::Shift => "TURNO",
            Field::AcademicTerm => "PERIODO",
            Field::Status => "STATUS",
            Field::ClassCode => "CODTURMA",
            Field::CampusCode => "CODPOLO",
            Field::Campus => "POLO",
            Field::City => "CIDADE",
            Field::Modality => "MODALIDADE",
        }
    }
}

static HEADER_MAP: OnceLock<HashMap<&'static str, Field>> = OnceLock::new();

/// Resolves a normalized header name to its canonical field. Unknown columns
/// resolve to `None` and are ignored by the parser.
pub(crate) fn field_for_header(normalized: &str) -> Option<Field> {
    header_map().get(normalized).copied()
}

fn header_map() -> &'static HashMap<&'static str, Field> {
    HEADER_MAP.get_or_init(|| {
        const HEADER_TO_FIELD: &[(&str, Field)] = &[
            ("codcoligada", Field::UnitCode),
            ("codfilial", Field::BranchCode),
            ("filial", Field::BranchName),
            ("semestre", Field::Period),
            ("curso", Field::Course),
            ("habilitacao", Field::Qualification),
            // Student id travels under several legacy names.
            ("ra", Field::StudentId),
            ("matricula", Field::StudentId),
            ("codmatricula", Field::StudentId),
            ("aluno", Field::StudentName),
            ("cpf", Field::NationalId),
            ("email", Field::Email),
            ("cep", Field::PostalCode),
            ("rua", Field::Street),
            ("numero", Field::Number),
            ("bairro", Field::District),
            ("telefone1", Field::Phone1),
            ("telefone2", Field::Phone2),
            ("dtmatricula", Field::EnrollmentDate),
            ("qtdcaptacao", Field::AcquisitionFlag),
            ("tipoingresso", Field::AdmissionType),
            ("turno", Field::Shift),
            ("periodo", Field::AcademicTerm),
            ("status", Field::Status),
            ("codturma", Field::ClassCode),
            ("codpolo", Field::CampusCode),
            ("polo", Field::Campus),
            ("cidade", Field::City),
            ("modalidade", Field::Modality),
        ];

        let mut map = HashMap::with_capacity(HEADER_TO_FIELD.len());
        for (name, field) in HEADER_TO_FIELD {
            map.insert(*name, *field);
        }
        map
    })
}
