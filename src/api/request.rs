//! Request types for the GPA engine API.
//!
//! The grade provider uses abbreviated Vietnamese field names and is loose
//! about types: strings may be null, scores may be numbers or text. These
//! structures accept that format and convert it into the stable models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::access::Role;
use crate::calculation::{RosterQuery, SimulatedCourse};
use crate::error::{EngineError, EngineResult};
use crate::models::{ComponentScores, GpaResult, GradeRecord, GradeScale, RawScore, Student};

/// Date formats seen in `ngay_sinh`.
const BIRTH_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Request body for the `/gpa` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpaRequest {
    /// The student and their transcript.
    pub student: StudentRequest,
    /// Semester bucket to report on, in addition to the cumulative GPA.
    #[serde(default)]
    pub semester: Option<String>,
}

/// Request body for the `/roster/rank` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterRequest {
    /// Students of the class or classes being compared.
    pub students: Vec<StudentRequest>,
    /// Semester bucket to rank by.
    #[serde(default)]
    pub semester: Option<String>,
    /// Scale to rank and display on.
    #[serde(default)]
    pub scale: GradeScale,
    /// Name or student number fragment.
    #[serde(default)]
    pub search: Option<String>,
}

impl RosterRequest {
    /// Splits the request into students and the ranking query.
    pub fn into_parts(self) -> EngineResult<(Vec<Student>, RosterQuery)> {
        let students = self
            .students
            .into_iter()
            .map(Student::try_from)
            .collect::<EngineResult<Vec<_>>>()?;
        let query = RosterQuery {
            semester: self.semester,
            scale: self.scale,
            search: self.search,
        };
        Ok((students, query))
    }
}

/// Request body for the `/simulate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateRequest {
    /// Credits already counted in the student's GPA.
    pub current_credits: Decimal,
    /// Σ(score4 × credit) already counted.
    pub current_points: Decimal,
    /// Hypothetical courses to add.
    #[serde(default)]
    pub courses: Vec<SimulatedCourse>,
}

impl SimulateRequest {
    /// Rejects negative totals.
    pub fn validate(&self) -> Result<(), String> {
        if self.current_credits < Decimal::ZERO {
            return Err("current_credits must not be negative".to_string());
        }
        if self.current_points < Decimal::ZERO {
            return Err("current_points must not be negative".to_string());
        }
        Ok(())
    }

    /// The current totals as a GPA result to project from.
    pub fn base(&self) -> GpaResult {
        GpaResult {
            total_credits: self.current_credits,
            total_points4: self.current_points,
            ..GpaResult::default()
        }
    }
}

/// Request body for the `/class-selection` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSelectionRequest {
    /// Account making the change.
    pub user_id: String,
    /// Role of that account.
    #[serde(default)]
    pub role: Role,
    /// Class to switch to.
    pub class_code: String,
}

/// A student as sent by the grade provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentRequest {
    /// Student number.
    pub msv: String,
    /// Full name.
    #[serde(default)]
    pub ho_ten: Option<String>,
    /// Date of birth, `YYYY-MM-DD` or `DD/MM/YYYY`.
    #[serde(default)]
    pub ngay_sinh: Option<String>,
    /// Class code.
    #[serde(default)]
    pub ma_lop: Option<String>,
    /// Place of birth.
    #[serde(default)]
    pub noi_sinh: Option<String>,
    /// Transcript rows. Absent or null is an error.
    #[serde(default)]
    pub diem: Option<Vec<GradeRequest>>,
}

/// One transcript row as sent by the grade provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradeRequest {
    /// Course code.
    #[serde(default)]
    pub ma_mon: Option<String>,
    /// Course name.
    #[serde(default)]
    pub ten_mon: Option<String>,
    /// Semester label.
    #[serde(default)]
    pub hoc_ky: Option<String>,
    /// Data-type tag.
    #[serde(default)]
    pub loai_du_lieu: Option<String>,
    /// Credits.
    #[serde(default)]
    pub so_tin_chi: Option<RawScore>,
    /// Final score, 10-point scale.
    #[serde(default)]
    pub tong_ket_10: Option<RawScore>,
    /// Final score, 4-point scale.
    #[serde(default)]
    pub tong_ket_4: Option<RawScore>,
    /// Letter grade.
    #[serde(default)]
    pub diem_chu: Option<RawScore>,
    /// Pass/fail result.
    #[serde(default)]
    pub ket_qua: Option<RawScore>,
    /// Backend exclusion flag.
    #[serde(default)]
    pub exclude_from_gpa: Option<bool>,
    /// Attendance.
    #[serde(default)]
    pub chuyen_can: Option<RawScore>,
    /// Coefficient-1 assessment, attempt 1.
    #[serde(default)]
    pub he_so_1_l1: Option<RawScore>,
    /// Coefficient-1 assessment, attempt 2.
    #[serde(default)]
    pub he_so_1_l2: Option<RawScore>,
    /// Coefficient-1 assessment, attempt 3.
    #[serde(default)]
    pub he_so_1_l3: Option<RawScore>,
    /// Coefficient-1 assessment, attempt 4.
    #[serde(default)]
    pub he_so_1_l4: Option<RawScore>,
    /// Coefficient-2 assessment, attempt 1.
    #[serde(default)]
    pub he_so_2_l1: Option<RawScore>,
    /// Coefficient-2 assessment, attempt 2.
    #[serde(default)]
    pub he_so_2_l2: Option<RawScore>,
    /// Coefficient-2 assessment, attempt 3.
    #[serde(default)]
    pub he_so_2_l3: Option<RawScore>,
    /// Coefficient-2 assessment, attempt 4.
    #[serde(default)]
    pub he_so_2_l4: Option<RawScore>,
    /// Practical 1.
    #[serde(default)]
    pub thuc_hanh_1: Option<RawScore>,
    /// Practical 2.
    #[serde(default)]
    pub thuc_hanh_2: Option<RawScore>,
    /// Regular-assessment average.
    #[serde(default)]
    pub tb_thuong_ky: Option<RawScore>,
    /// Exam eligibility.
    #[serde(default)]
    pub dieu_kien_thi: Option<RawScore>,
    /// Exam score.
    #[serde(default)]
    pub diem_thi: Option<RawScore>,
    /// Semester average, 10-point scale.
    #[serde(default)]
    pub tb_hoc_ky_10: Option<RawScore>,
    /// Semester average, 4-point scale.
    #[serde(default)]
    pub tb_hoc_ky_4: Option<RawScore>,
    /// Cumulative average, 10-point scale.
    #[serde(default)]
    pub tb_tich_luy_10: Option<RawScore>,
    /// Cumulative average, 4-point scale.
    #[serde(default)]
    pub tb_tich_luy_4: Option<RawScore>,
}

/// Renders a display-only value as text.
fn text(value: Option<RawScore>) -> Option<String> {
    match value? {
        RawScore::Number(n) => Some(n.to_string()),
        RawScore::Text(s) => Some(s),
    }
}

fn parse_birth_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    BIRTH_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

impl From<GradeRequest> for GradeRecord {
    fn from(req: GradeRequest) -> Self {
        GradeRecord {
            course_code: req.ma_mon.unwrap_or_default(),
            course_name: req.ten_mon.unwrap_or_default(),
            semester: req.hoc_ky.unwrap_or_default(),
            data_type: req.loai_du_lieu.unwrap_or_default(),
            credits: req.so_tin_chi,
            score_10: req.tong_ket_10,
            score_4: req.tong_ket_4,
            letter_grade: text(req.diem_chu),
            result: text(req.ket_qua),
            exclude_from_gpa: req.exclude_from_gpa,
            components: ComponentScores {
                attendance: text(req.chuyen_can),
                coefficient_1: [
                    text(req.he_so_1_l1),
                    text(req.he_so_1_l2),
                    text(req.he_so_1_l3),
                    text(req.he_so_1_l4),
                ],
                coefficient_2: [
                    text(req.he_so_2_l1),
                    text(req.he_so_2_l2),
                    text(req.he_so_2_l3),
                    text(req.he_so_2_l4),
                ],
                practical_1: text(req.thuc_hanh_1),
                practical_2: text(req.thuc_hanh_2),
                regular_average: text(req.tb_thuong_ky),
                exam_eligibility: text(req.dieu_kien_thi),
                exam_score: text(req.diem_thi),
                semester_average_10: text(req.tb_hoc_ky_10),
                semester_average_4: text(req.tb_hoc_ky_4),
                cumulative_average_10: text(req.tb_tich_luy_10),
                cumulative_average_4: text(req.tb_tich_luy_4),
            },
        }
    }
}

impl TryFrom<StudentRequest> for Student {
    type Error = EngineError;

    fn try_from(req: StudentRequest) -> Result<Self, Self::Error> {
        let Some(diem) = req.diem else {
            return Err(EngineError::MissingRecords { student_id: req.msv });
        };

        Ok(Student {
            date_of_birth: parse_birth_date(req.ngay_sinh.as_deref()),
            id: req.msv,
            full_name: req.ho_ten.unwrap_or_default(),
            place_of_birth: req.noi_sinh,
            class_code: req.ma_lop.unwrap_or_default(),
            records: diem.into_iter().map(Into::into).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_gpa_request() {
        let json = r#"{
            "student": {
                "msv": "2251010001",
                "ho_ten": "Nguyễn Văn An",
                "ngay_sinh": "15/03/2004",
                "ma_lop": "DHMT16A1HN",
                "diem": [
                    {
                        "ma_mon": "0101001234",
                        "ten_mon": "Giải tích 1",
                        "hoc_ky": "Học kỳ 1 (2023 - 2024)",
                        "so_tin_chi": 3,
                        "tong_ket_10": "8,5",
                        "tong_ket_4": null,
                        "diem_chu": "A",
                        "he_so_1_l1": 9,
                        "diem_thi": "8.0"
                    }
                ]
            },
            "semester": "Học kỳ 1 (2023 - 2024)"
        }"#;

        let request: GpaRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.semester.as_deref(), Some("Học kỳ 1 (2023 - 2024)"));

        let student = Student::try_from(request.student).unwrap();
        assert_eq!(student.id, "2251010001");
        assert_eq!(student.date_of_birth, NaiveDate::from_ymd_opt(2004, 3, 15));
        assert_eq!(student.records.len(), 1);

        let record = &student.records[0];
        assert_eq!(record.course_code, "0101001234");
        assert_eq!(record.credits, Some(RawScore::Number(3.0)));
        assert_eq!(record.score_10, Some(RawScore::Text("8,5".to_string())));
        assert_eq!(record.score_4, None);
        assert_eq!(record.letter_grade.as_deref(), Some("A"));
        assert_eq!(record.components.coefficient_1[0].as_deref(), Some("9"));
        assert_eq!(record.components.exam_score.as_deref(), Some("8.0"));
    }

    #[test]
    fn test_missing_diem_is_rejected() {
        let request: StudentRequest = serde_json::from_str(r#"{"msv": "sv_001"}"#).unwrap();
        match Student::try_from(request) {
            Err(EngineError::MissingRecords { student_id }) => assert_eq!(student_id, "sv_001"),
            other => panic!("Expected MissingRecords, got {:?}", other),
        }
    }

    #[test]
    fn test_null_diem_is_rejected() {
        let request: StudentRequest =
            serde_json::from_str(r#"{"msv": "sv_001", "diem": null}"#).unwrap();
        assert!(Student::try_from(request).is_err());
    }

    #[test]
    fn test_empty_diem_is_accepted() {
        let request: StudentRequest =
            serde_json::from_str(r#"{"msv": "sv_001", "diem": []}"#).unwrap();
        let student = Student::try_from(request).unwrap();
        assert!(student.records.is_empty());
    }

    #[test]
    fn test_null_text_fields_become_empty() {
        let grade: GradeRequest =
            serde_json::from_str(r#"{"ma_mon": null, "ten_mon": null, "hoc_ky": null}"#).unwrap();
        let record: GradeRecord = grade.into();
        assert!(record.course_code.is_empty());
        assert!(record.course_name.is_empty());
        assert!(record.semester.is_empty());
    }

    #[test]
    fn test_birth_date_formats() {
        assert_eq!(
            parse_birth_date(Some("2004-03-15")),
            NaiveDate::from_ymd_opt(2004, 3, 15)
        );
        assert_eq!(
            parse_birth_date(Some(" 15/03/2004 ")),
            NaiveDate::from_ymd_opt(2004, 3, 15)
        );
        assert_eq!(parse_birth_date(Some("không rõ")), None);
        assert_eq!(parse_birth_date(None), None);
    }

    #[test]
    fn test_roster_request_into_parts() {
        let json = r#"{
            "students": [{"msv": "a", "diem": []}, {"msv": "b", "diem": []}],
            "scale": "10",
            "search": "a"
        }"#;

        let request: RosterRequest = serde_json::from_str(json).unwrap();
        let (students, query) = request.into_parts().unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(query.scale, GradeScale::Ten);
        assert_eq!(query.search.as_deref(), Some("a"));
    }

    #[test]
    fn test_roster_request_with_missing_diem_fails() {
        let json = r#"{"students": [{"msv": "a", "diem": []}, {"msv": "b"}]}"#;
        let request: RosterRequest = serde_json::from_str(json).unwrap();
        assert!(matches!(
            request.into_parts(),
            Err(EngineError::MissingRecords { student_id }) if student_id == "b"
        ));
    }

    #[test]
    fn test_simulate_request_validation() {
        let request: SimulateRequest = serde_json::from_str(
            r#"{"current_credits": "30", "current_points": "90", "courses": []}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.base().total_credits, Decimal::from(30));

        let negative = SimulateRequest {
            current_credits: Decimal::from(-1),
            ..request
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_class_selection_role_defaults_to_user() {
        let request: ClassSelectionRequest =
            serde_json::from_str(r#"{"user_id": "u1", "class_code": "DHMT16A1HN"}"#).unwrap();
        assert_eq!(request.role, Role::User);
    }
}
