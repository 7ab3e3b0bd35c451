//! Session-start shuffling.
//!
//! A uniform random permutation applied once per `start()`: the question
//! order, and independently each question's option order. Only order changes;
//! the id sets are untouched.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::Quiz;
use crate::prefs::UserPreferences;

pub fn shuffle_for_session<R: Rng>(quiz: &mut Quiz, prefs: &UserPreferences, rng: &mut R) {
    if prefs.shuffle_questions {
        quiz.questions.shuffle(rng);
    }
    if prefs.shuffle_options {
        for question in &mut quiz.questions {
            question.options.shuffle(rng);
        }
    }
}
