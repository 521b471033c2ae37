use crate::models::domain::{Question, QuestionType, Quiz, QuizType};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    pub fn mcq_question(id: &str, answer: &str) -> Question {
        Question {
            id: id.to_string(),
            question: "What is the SI unit of current?".to_string(),
            question_type: QuestionType::MultipleChoice,
            options: vec![
                "A. Volt".to_string(),
                "B. Ohm".to_string(),
                "C. Ampere".to_string(),
                "D. Watt".to_string(),
            ],
            answer: answer.to_string(),
            explanation: "Current is measured in amperes.".to_string(),
        }
    }

    pub fn fill_blank_question(id: &str, answer: &str) -> Question {
        Question {
            id: id.to_string(),
            question: "The unit of resistance is ___.".to_string(),
            question_type: QuestionType::FillBlank,
            options: vec![],
            answer: answer.to_string(),
            explanation: String::new(),
        }
    }

    pub fn descriptive_question(id: &str) -> Question {
        Question {
            id: id.to_string(),
            question: "Explain Ohm's law.".to_string(),
            question_type: QuestionType::Descriptive,
            options: vec![],
            answer: "V = IR".to_string(),
            explanation: "Voltage is proportional to current.".to_string(),
        }
    }

    pub fn quiz_for(user_id: &str, questions: Vec<Question>) -> Quiz {
        Quiz::new(
            user_id,
            QuizType::Combined,
            "10",
            "CBSE",
            "Physics",
            vec!["Electricity".to_string()],
            questions,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn fixtures_produce_distinct_quizzes() {
        let a = quiz_for("user-1", vec![mcq_question("q-1", "C. Ampere")]);
        let b = quiz_for("user-1", vec![fill_blank_question("q-1", "ohm")]);

        assert_ne!(a.id, b.id);
        assert_eq!(a.questions.len(), 1);
        assert!(descriptive_question("q-2").options.is_empty());
    }
}
