//! crates/quiz_core/src/local.rs
//!
//! The built-in question pool used when the trivia service is unavailable
//! or when the user picks the local source.

use crate::domain::{Difficulty, DifficultyFilter, Question, SourceKind};
use crate::ports::{PortResult, QuestionSource, Shuffler};
use crate::shuffle::shuffled;
use crate::trivia::TriviaItem;
use async_trait::async_trait;
use std::sync::Arc;

struct LocalQuestion {
    question: &'static str,
    correct_answer: &'static str,
    incorrect_answers: [&'static str; 3],
    category: &'static str,
    difficulty: Difficulty,
}

impl LocalQuestion {
    fn to_item(&self) -> TriviaItem {
        TriviaItem {
            question: self.question.to_string(),
            correct_answer: self.correct_answer.to_string(),
            incorrect_answers: self.incorrect_answers.iter().map(|s| s.to_string()).collect(),
            category: self.category.to_string(),
            difficulty: self.difficulty.as_str().to_string(),
        }
    }
}

const LOCAL_QUESTIONS: [LocalQuestion; 10] = [
    LocalQuestion {
        question: "Which HTML tag is used to define an unordered list?",
        correct_answer: "<ul>",
        incorrect_answers: ["<ol>", "<li>", "<list>"],
        category: "Web",
        difficulty: Difficulty::Easy,
    },
    LocalQuestion {
        question: "What is the output of: console.log(typeof NaN)?",
        correct_answer: "number",
        incorrect_answers: ["NaN", "undefined", "object"],
        category: "JavaScript",
        difficulty: Difficulty::Easy,
    },
    LocalQuestion {
        question: "Which data structure uses FIFO order?",
        correct_answer: "Queue",
        incorrect_answers: ["Stack", "Tree", "Graph"],
        category: "CS",
        difficulty: Difficulty::Easy,
    },
    LocalQuestion {
        question: "React hooks must be called…",
        correct_answer: "at the top level of a functional component",
        incorrect_answers: [
            "inside loops and conditions",
            "from class methods",
            "from any nested function",
        ],
        category: "React",
        difficulty: Difficulty::Medium,
    },
    LocalQuestion {
        question: "Which of these is NOT a valid HTTP method?",
        correct_answer: "FETCH",
        incorrect_answers: ["PUT", "PATCH", "DELETE"],
        category: "Web",
        difficulty: Difficulty::Medium,
    },
    LocalQuestion {
        question: "In CSS, what does the 'rem' unit scale with?",
        correct_answer: "The root element's font-size",
        incorrect_answers: [
            "The parent element's font-size",
            "Viewport width",
            "Device pixel ratio",
        ],
        category: "CSS",
        difficulty: Difficulty::Medium,
    },
    LocalQuestion {
        question: "Which algorithm has average time complexity O(n log n)?",
        correct_answer: "Merge Sort",
        incorrect_answers: ["Bubble Sort", "Insertion Sort", "Counting Sort"],
        category: "Algorithms",
        difficulty: Difficulty::Medium,
    },
    LocalQuestion {
        question: "What does SQL stand for?",
        correct_answer: "Structured Query Language",
        incorrect_answers: [
            "Simple Query Language",
            "Sequential Query Language",
            "Structured Question Language",
        ],
        category: "Databases",
        difficulty: Difficulty::Easy,
    },
    LocalQuestion {
        question: "Which Android component is responsible for background tasks that must finish even if the app closes?",
        correct_answer: "WorkManager",
        incorrect_answers: ["Service", "BroadcastReceiver", "ContentProvider"],
        category: "Android",
        difficulty: Difficulty::Hard,
    },
    LocalQuestion {
        question: "The GCD of two numbers can be efficiently computed using…",
        correct_answer: "Euclid's algorithm",
        incorrect_answers: [
            "Sieve of Eratosthenes",
            "Fast Fourier Transform",
            "Karatsuba algorithm",
        ],
        category: "Math",
        difficulty: Difficulty::Easy,
    },
];

/// Serves questions from the fixed built-in pool.
#[derive(Clone)]
pub struct LocalQuestionSource {
    shuffler: Arc<dyn Shuffler>,
}

impl LocalQuestionSource {
    pub fn new(shuffler: Arc<dyn Shuffler>) -> Self {
        Self { shuffler }
    }

    /// Filters, shuffles and truncates the pool, then shuffles each question's options.
    pub fn pick(&self, count: u32, difficulty: DifficultyFilter) -> Vec<Question> {
        let pool: Vec<&LocalQuestion> = LOCAL_QUESTIONS
            .iter()
            .filter(|q| difficulty.matches(q.difficulty))
            .collect();

        shuffled(self.shuffler.as_ref(), pool)
            .into_iter()
            .take(count as usize)
            .map(|q| q.to_item().into_question(self.shuffler.as_ref()))
            .collect()
    }
}

#[async_trait]
impl QuestionSource for LocalQuestionSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Local
    }

    async fn fetch_questions(
        &self,
        count: u32,
        difficulty: DifficultyFilter,
    ) -> PortResult<Vec<Question>> {
        Ok(self.pick(count, difficulty))
    }
}
