//! Prompt construction for the generative provider. Pure string building,
//! no I/O: the same parameters always produce the same prompt.

use crate::models::domain::{Question, QuestionType};

/// Builds the generation prompt for one question type. The contract pushed
/// onto the model: exactly `count` questions, a single JSON object with a
/// `questions` array, four lettered options for multiple choice, and no
/// prose or markdown fencing around the JSON.
pub fn build_generation_prompt(
    question_type: QuestionType,
    class_label: &str,
    curriculum: &str,
    subject: &str,
    chapters: &[String],
    count: u32,
) -> String {
    let type_instructions = match question_type {
        QuestionType::MultipleChoice => {
            "Each question must be multiple-choice with an \"options\" array of exactly 4 entries, \
             each prefixed with a letter label (\"A. \", \"B. \", \"C. \", \"D. \"). \
             The \"answer\" field must repeat the correct option, letter label included."
        }
        QuestionType::FillBlank => {
            "Each question must be a fill-in-the-blank sentence with the blank written as \"___\". \
             Do not include an \"options\" array. \
             The \"answer\" field must hold only the exact word or phrase that fills the blank."
        }
        QuestionType::Descriptive => {
            "Each question must require a short written answer of 3-5 sentences. \
             Do not include an \"options\" array. \
             The \"answer\" field must hold a model answer a teacher would accept."
        }
    };

    format!(
        "You are an experienced {curriculum} teacher preparing an exam for class {class_label}.\n\
         Generate exactly {count} questions on the subject \"{subject}\", covering these chapters: {chapters}.\n\
         {type_instructions}\n\
         Every question must also carry an \"explanation\" field justifying the answer.\n\
         Respond with a single JSON object of the form {{\"questions\": [...]}} where each array entry \
         has the keys \"question\", \"answer\", \"explanation\"{options_key}.\n\
         Output only the JSON object. No prose, no markdown fences, nothing outside the JSON.",
        curriculum = curriculum,
        class_label = class_label,
        count = count,
        subject = subject,
        chapters = chapters.join(", "),
        type_instructions = type_instructions,
        options_key = if question_type == QuestionType::MultipleChoice {
            " and \"options\""
        } else {
            ""
        },
    )
}

/// Builds the grading prompt for one descriptive answer. The reference block
/// appears only when OCR extracted something.
pub fn build_evaluation_prompt(
    question: &Question,
    typed_answer: &str,
    reference_text: &str,
) -> String {
    let reference_block = if reference_text.trim().is_empty() {
        String::new()
    } else {
        format!(
            "\nReference material extracted from the student's uploaded document:\n{}\n",
            reference_text
        )
    };

    format!(
        "You are grading a student's written answer.\n\
         Question: {question}\n\
         Model answer: {model_answer}\n\
         Student's answer: {typed_answer}\n\
         {reference_block}\
         Score the answer from 0 to 10 against the model answer, rewarding correct concepts \
         and penalizing factual errors.\n\
         Respond with a single JSON object with exactly these keys: \
         \"score\" (integer 0-10), \"feedback\" (string), \"correct_parts\" (string), \
         \"improvements\" (string).\n\
         Output only the JSON object, with no prose or markdown around it.",
        question = question.question,
        model_answer = question.answer,
        typed_answer = typed_answer,
        reference_block = reference_block,
    )
}
