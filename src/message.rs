//! Notification message composition

use crate::models::StudentRecord;

/// Compose the spoken notification text for one student.
///
/// Branches only on whether the result equals "pass" (case-insensitive):
/// a pass message carries the SPI score, a fail message omits it and asks
/// the guardian to contact the college.
pub fn compose(record: &StudentRecord, relation: &str) -> String {
    if record.result.trim().eq_ignore_ascii_case("pass") {
        format!(
            "Hello Mr. {}. This is a message from your child's college. \
             Your {} {} has passed semester {} with SPI {}. Thank you.",
            record.father_name, relation, record.name, record.semester, record.spi
        )
    } else {
        format!(
            "Hello Mr. {}. This is a message from your child's college. \
             Your {} {} has failed semester {}. Please contact the college. Thank you.",
            record.father_name, relation, record.name, record.semester
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(result: &str) -> StudentRecord {
        StudentRecord {
            name: "Amit Patel".into(),
            roll_no: "CE042".into(),
            semester: "4".into(),
            spi: "8.2".into(),
            result: result.into(),
            father_name: "Rajesh Patel".into(),
            mother_name: "Sunita Patel".into(),
            father_contact: "9876543210".into(),
        }
    }

    #[test]
    fn pass_message_includes_score() {
        let msg = compose(&record("Pass"), "son");
        assert!(msg.contains("Rajesh Patel"));
        assert!(msg.contains("Your son Amit Patel has passed semester 4"));
        assert!(msg.contains("SPI 8.2"));
    }

    #[test]
    fn fail_message_omits_score_and_asks_for_contact() {
        let msg = compose(&record("Fail"), "daughter");
        assert!(msg.contains("Your daughter Amit Patel has failed semester 4"));
        assert!(!msg.contains("SPI"));
        assert!(msg.contains("Please contact the college"));
    }

    #[test]
    fn result_comparison_is_case_insensitive() {
        assert!(compose(&record("PASS"), "son").contains("has passed"));
        assert!(compose(&record("pending"), "son").contains("has failed"));
    }
}
