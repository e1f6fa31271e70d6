//! The fixed self-reflection questionnaire a flower grows from.

use serde::Serialize;

use crate::model::Answer;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: u32,
    pub text: &'static str,
    /// Option texts for A, B, C, D in order.
    pub options: [&'static str; 4],
}

impl Question {
    pub fn option(&self, answer: Answer) -> &'static str {
        match answer {
            Answer::A => self.options[0],
            Answer::B => self.options[1],
            Answer::C => self.options[2],
            Answer::D => self.options[3],
        }
    }
}

pub static QUESTIONS: [Question; 10] = [
    Question {
        id: 1,
        text: "How would you describe your mood today?",
        options: [
            "Energetic and passionate",
            "Calm and peaceful",
            "Bright and optimistic",
            "Gentle and compassionate",
        ],
    },
    Question {
        id: 2,
        text: "What type of environment makes you feel most at home?",
        options: [
            "A warm, cozy room with a fireplace",
            "A quiet space near the ocean or a lake",
            "A sunny garden filled with flowers",
            "A soft, comfortable space with loved ones",
        ],
    },
    Question {
        id: 3,
        text: "How do you handle challenges in your life?",
        options: [
            "I tackle them head-on with determination",
            "I think deeply and develop a careful plan",
            "I look for the positive aspects and opportunities",
            "I seek support and connect with others",
        ],
    },
    Question {
        id: 4,
        text: "What activity helps you relax the most?",
        options: [
            "Physical exercise or sports",
            "Reading or meditation",
            "Being outdoors in nature",
            "Creative activities or arts",
        ],
    },
    Question {
        id: 5,
        text: "How would you prefer to spend a free day?",
        options: [
            "Going on an adventure or trying something new",
            "Spending time alone in quiet reflection",
            "Exploring parks or gardening",
            "Connecting with friends or family",
        ],
    },
    Question {
        id: 6,
        text: "What quality do you value most in others?",
        options: [
            "Courage and determination",
            "Wisdom and insight",
            "Optimism and cheerfulness",
            "Kindness and empathy",
        ],
    },
    Question {
        id: 7,
        text: "What motivates you to keep going when things get difficult?",
        options: [
            "The desire to overcome challenges and succeed",
            "The understanding that everything is temporary",
            "The hope that things will improve soon",
            "The support and care from people around me",
        ],
    },
    Question {
        id: 8,
        text: "What type of music do you enjoy most?",
        options: [
            "Energetic and upbeat music",
            "Calming instrumental pieces",
            "Cheerful, positive songs",
            "Emotional, meaningful ballads",
        ],
    },
    Question {
        id: 9,
        text: "How do you approach new experiences?",
        options: [
            "With excitement and enthusiasm",
            "With careful thought and consideration",
            "With curiosity and openness",
            "With warmth and appreciation",
        ],
    },
    Question {
        id: 10,
        text: "What do you hope your flower will represent?",
        options: [
            "Strength and passion",
            "Tranquility and depth",
            "Joy and brightness",
            "Love and compassion",
        ],
    },
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Next(&'static Question),
    Complete(Vec<Answer>),
}

/// Walks one user through `QUESTIONS`, one answer at a time.
#[derive(Clone, Debug, Default)]
pub struct Questionnaire {
    answers: Vec<Answer>,
}

impl Questionnaire {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&'static Question> {
        QUESTIONS.get(self.answers.len())
    }

    /// Record an answer. After the last question the collected answers are
    /// handed back and the tracker starts over.
    pub fn answer(&mut self, answer: Answer) -> Step {
        self.answers.push(answer);
        match self.current() {
            Some(q) => Step::Next(q),
            None => Step::Complete(std::mem::take(&mut self.answers)),
        }
    }

    /// Percent of the questionnaire shown so far, counting the current one.
    pub fn progress(&self) -> f64 {
        let shown = (self.answers.len() + 1).min(QUESTIONS.len());
        shown as f64 / QUESTIONS.len() as f64 * 100.0
    }

    pub fn answered(&self) -> &[Answer] {
        &self.answers
    }

    pub fn reset(&mut self) {
        self.answers.clear();
    }
}
