//! crates/quiz_core/src/trivia.rs
//!
//! The upstream trivia record and its normalisation into a `Question`.

use crate::domain::{Difficulty, Question};
use crate::ports::Shuffler;
use crate::shuffle::shuffled;
use serde::Deserialize;

/// One element of the trivia service's `results` array. The built-in pool
/// uses the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TriviaItem {
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: String,
}

impl TriviaItem {
    /// Places the correct answer among the incorrect ones in a random order
    /// and records where it landed.
    pub fn into_question(self, shuffler: &dyn Shuffler) -> Question {
        // Index 0 is the correct answer before shuffling; track it by position
        // so duplicate strings cannot move it.
        let candidates: Vec<(usize, String)> = std::iter::once(self.correct_answer)
            .chain(self.incorrect_answers)
            .enumerate()
            .collect();
        let ordered = shuffled(shuffler, candidates);
        let correct_index = ordered
            .iter()
            .position(|(original, _)| *original == 0)
            .unwrap_or(0);

        Question {
            text: self.question,
            options: ordered.into_iter().map(|(_, text)| text).collect(),
            correct_index,
            category: self.category,
            difficulty: Difficulty::from_label(&self.difficulty),
        }
    }

    /// Applies `decode` to the question and every answer string.
    pub fn map_text(self, decode: impl Fn(&str) -> String) -> Self {
        Self {
            question: decode(&self.question),
            correct_answer: decode(&self.correct_answer),
            incorrect_answers: self.incorrect_answers.iter().map(|a| decode(a)).collect(),
            category: decode(&self.category),
            difficulty: self.difficulty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shuffle::{SeededShuffler, ThreadRngShuffler};

    fn item() -> TriviaItem {
        TriviaItem {
            question: "Which data structure uses FIFO order?".to_string(),
            correct_answer: "Queue".to_string(),
            incorrect_answers: vec!["Stack".into(), "Tree".into(), "Graph".into()],
            category: "CS".to_string(),
            difficulty: "easy".to_string(),
        }
    }

    #[test]
    fn correct_index_always_points_at_correct_answer() {
        let shuffler = ThreadRngShuffler;
        let mut positions = [0usize; 4];
        for _ in 0..400 {
            let q = item().into_question(&shuffler);
            assert_eq!(q.options.len(), 4);
            assert_eq!(q.correct_answer(), Some("Queue"));
            assert!(q.validate().is_ok());
            positions[q.correct_index] += 1;
        }
        // Every slot should be hit at least once over 400 trials.
        assert!(positions.iter().all(|&n| n > 0), "{:?}", positions);
    }

    #[test]
    fn duplicate_answer_strings_keep_the_correct_position() {
        let shuffler = SeededShuffler::new(11);
        for _ in 0..50 {
            let q = TriviaItem {
                question: "Pick the first".into(),
                correct_answer: "same".into(),
                incorrect_answers: vec!["same".into(), "other".into()],
                category: String::new(),
                difficulty: "hard".into(),
            }
            .into_question(&shuffler);
            assert_eq!(q.correct_answer(), Some("same"));
            assert_eq!(q.difficulty, Difficulty::Hard);
        }
    }

    #[test]
    fn deserializes_upstream_shape() {
        let json = r#"{
            "type": "multiple",
            "difficulty": "medium",
            "category": "Science: Computers",
            "question": "What does CPU stand for?",
            "correct_answer": "Central Processing Unit",
            "incorrect_answers": ["Central Process Unit", "Computer Personal Unit", "Central Processor Unit"]
        }"#;
        let parsed: TriviaItem = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.incorrect_answers.len(), 3);
        assert_eq!(parsed.difficulty, "medium");
    }
}
