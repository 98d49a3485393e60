//! 以字符串形式存库的枚举
//!
//! 数据库里保存大写字符串（如 `"PRESENT"`），JSON 中同样使用这些字符串。

use serde::{Deserialize, Serialize};

macro_rules! define_string_enum {
    ($(
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    )*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
            pub enum $name {
                $(#[serde(rename = $text)] $variant,)+
            }

            impl $name {
                pub const ALL: &'static [$name] = &[$($name::$variant),+];

                pub fn as_str(&self) -> &'static str {
                    match self {
                        $($name::$variant => $text,)+
                    }
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl std::str::FromStr for $name {
                type Err = String;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    match s {
                        $($text => Ok($name::$variant),)+
                        _ => Err(format!(
                            "Invalid {}: '{}'. Expected one of: {}",
                            stringify!($name),
                            s,
                            [$($text),+].join(", ")
                        )),
                    }
                }
            }
        )*
    };
}

define_string_enum! {
    /// 用户角色
    UserRole {
        Student => "STUDENT",
        Faculty => "FACULTY",
        Admin => "ADMIN",
    }

    /// 学期类型
    SemesterType {
        Odd => "ODD",
        Even => "EVEN",
    }

    /// 科目类型
    SubjectType {
        Mandatory => "MANDATORY",
        Elective => "ELECTIVE",
    }

    /// 授课类型
    LectureType {
        Theory => "THEORY",
        Practical => "PRACTICAL",
    }

    /// 考试类型
    ExamType {
        Midterm => "MIDTERM",
        Remedial => "REMEDIAL",
        Final => "FINAL",
        Repeat => "REPEAT",
    }

    /// 考试结果
    ResultStatus {
        Pass => "PASS",
        Fail => "FAIL",
    }

    /// 考勤状态
    AttendanceStatus {
        Present => "PRESENT",
        Absent => "ABSENT",
        MedicalLeave => "MEDICAL_LEAVE",
    }

    /// 提交状态
    SubmissionStatus {
        Submitted => "SUBMITTED",
        PendingReview => "PENDING_REVIEW",
        Graded => "GRADED",
        Late => "LATE",
    }

    /// 实习状态
    InternshipStatus {
        Applied => "APPLIED",
        Ongoing => "ONGOING",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

impl UserRole {
    /// 教职工与管理员
    pub fn staff_roles() -> &'static [&'static UserRole] {
        &[&Self::Faculty, &Self::Admin]
    }
}
