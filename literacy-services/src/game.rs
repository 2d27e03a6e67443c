//! Quiz progress and the learning tree

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{load_versioned, save_versioned, ProfileStorage};

pub const GAME_KEY: &str = "gameData";
const GAME_SCHEMA_VERSION: u32 = 1;

/// Quiz answers counted per calendar day.
pub const DAILY_QUIZ_LIMIT: u32 = 10;

const POINTS_PER_CORRECT: u32 = 100;
const PROGRESS_PER_CORRECT: u8 = 5;

/// Persistent quiz state for one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameProgress {
    pub points: u32,
    pub streak: u32,
    /// Course progress percentage (0-100).
    pub progress: u8,
    #[serde(default)]
    pub starred_cards: Vec<u32>,
    #[serde(default)]
    pub correct_answers: u32,
    #[serde(default)]
    pub daily_quizzes_completed: u32,
    pub last_play_date: NaiveDate,
}

impl Default for GameProgress {
    fn default() -> Self {
        Self {
            points: 1350,
            streak: 9,
            progress: 65,
            starred_cards: Vec::new(),
            correct_answers: 0,
            daily_quizzes_completed: 0,
            last_play_date: Utc::now().date_naive(),
        }
    }
}

/// Storage-backed quiz state.
pub struct GameProgressStore {
    storage: Arc<dyn ProfileStorage>,
}

impl GameProgressStore {
    pub fn new(storage: Arc<dyn ProfileStorage>) -> Self {
        Self { storage }
    }

    /// Current progress, with the daily counter reset on a new day.
    pub fn load(&self) -> GameProgress {
        self.load_at(Utc::now().date_naive())
    }

    fn load_at(&self, today: NaiveDate) -> GameProgress {
        let mut progress: GameProgress =
            load_versioned(self.storage.as_ref(), GAME_KEY, GAME_SCHEMA_VERSION)
                .unwrap_or_default();
        if progress.last_play_date != today {
            progress.daily_quizzes_completed = 0;
        }
        progress
    }

    /// Records one quiz answer and returns the updated progress. Answers
    /// past the daily limit leave the state untouched.
    pub fn record_answer(&self, correct: bool) -> GameProgress {
        let today = Utc::now().date_naive();
        let mut progress = self.load_at(today);

        if progress.daily_quizzes_completed >= DAILY_QUIZ_LIMIT {
            return progress;
        }

        if correct {
            progress.points += POINTS_PER_CORRECT;
            progress.streak += 1;
            progress.progress = progress
                .progress
                .saturating_add(PROGRESS_PER_CORRECT)
                .min(100);
            progress.correct_answers += 1;
        } else {
            progress.streak = 0;
        }
        progress.daily_quizzes_completed += 1;
        progress.last_play_date = today;

        self.save(&progress);
        progress
    }

    /// Stars an unstarred card, unstars a starred one.
    pub fn toggle_star(&self, card_id: u32) -> GameProgress {
        let today = Utc::now().date_naive();
        let mut progress = self.load_at(today);

        if let Some(index) = progress.starred_cards.iter().position(|&id| id == card_id) {
            progress.starred_cards.remove(index);
        } else {
            progress.starred_cards.push(card_id);
        }
        progress.last_play_date = today;

        self.save(&progress);
        progress
    }

    fn save(&self, progress: &GameProgress) {
        save_versioned(self.storage.as_ref(), GAME_KEY, GAME_SCHEMA_VERSION, progress);
    }
}

/// Growth stage of the learning tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeStage {
    Seed,
    Sprout,
    Sapling,
    Tree,
}

impl TreeStage {
    /// Stage reached after this many correct answers.
    pub fn for_correct_answers(correct: u32) -> Self {
        if correct < 2 {
            TreeStage::Seed
        } else if correct < 4 {
            TreeStage::Sprout
        } else if correct < 7 {
            TreeStage::Sapling
        } else {
            TreeStage::Tree
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TreeStage::Seed | TreeStage::Sprout => "🌱",
            TreeStage::Sapling => "🌿",
            TreeStage::Tree => "🌳",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TreeStage::Seed => "Just planted!",
            TreeStage::Sprout => "Growing strong!",
            TreeStage::Sapling => "Taking root!",
            TreeStage::Tree => "Fully grown!",
        }
    }

    /// Display color as a hex string.
    pub fn color(&self) -> &'static str {
        match self {
            TreeStage::Seed => "#8B4513",
            TreeStage::Sprout => "#7CB342",
            TreeStage::Sapling | TreeStage::Tree => "#2ECC71",
        }
    }
}
