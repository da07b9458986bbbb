//! Standard spelling curriculum.
//!
//! Gates are cumulative across the whole history. Keep `mastery_gate`
//! non-decreasing when editing; `validate_phases` rejects the table otherwise.

use crate::types::CurriculumPhase;

pub const TIER_FOUNDATIONS: &str = "Foundations";
pub const TIER_BUILDER: &str = "Word Builder";
pub const TIER_CHALLENGER: &str = "Challenger";

pub const CURRICULUM: &[CurriculumPhase] = &[
    // ---- Foundations ----
    CurriculumPhase {
        id: "short-vowels",
        name: "Short Vowel Sounds",
        description: "Three-letter words built on a single short vowel.",
        tier: TIER_FOUNDATIONS,
        categories: &["short-a", "short-e", "short-i", "short-o", "short-u"],
        mastery_gate: 20,
        accuracy_gate: 0.7,
    },
    CurriculumPhase {
        id: "digraphs-blends",
        name: "Digraphs & Blends",
        description: "Two letters, one sound, and consonant clusters at either end of a word.",
        tier: TIER_FOUNDATIONS,
        categories: &["digraphs", "consonant-blends", "double-consonants"],
        mastery_gate: 40,
        accuracy_gate: 0.7,
    },
    CurriculumPhase {
        id: "magic-e",
        name: "Magic E",
        description: "A silent final e that makes the vowel say its name, plus soft c and g.",
        tier: TIER_FOUNDATIONS,
        categories: &["silent-e", "soft-c-g"],
        mastery_gate: 65,
        accuracy_gate: 0.72,
    },
    // ---- Word Builder ----
    CurriculumPhase {
        id: "vowel-teams",
        name: "Vowel Teams",
        description: "Two vowels walking together: ai/ay, ee/ea, oa/ow.",
        tier: TIER_BUILDER,
        categories: &["vowel-teams-ai-ay", "vowel-teams-ee-ea", "vowel-teams-oa-ow"],
        mastery_gate: 95,
        accuracy_gate: 0.75,
    },
    CurriculumPhase {
        id: "r-controlled",
        name: "Bossy R",
        description: "Vowels changed by a following r: ar, or, er, ir, ur.",
        tier: TIER_BUILDER,
        categories: &["r-controlled-ar-or", "r-controlled-er-ir-ur"],
        mastery_gate: 130,
        accuracy_gate: 0.75,
    },
    CurriculumPhase {
        id: "word-endings",
        name: "Word Endings",
        description: "Suffixes, plurals and the doubling rule.",
        tier: TIER_BUILDER,
        categories: &["suffix-ing-ed", "plural-s-es", "doubling-rule"],
        mastery_gate: 170,
        accuracy_gate: 0.78,
    },
    // ---- Challenger ----
    CurriculumPhase {
        id: "tricky-words",
        name: "Tricky Words",
        description: "Silent letters, homophones and the many sounds of ough.",
        tier: TIER_CHALLENGER,
        categories: &["silent-letters", "homophones", "ough-words"],
        mastery_gate: 215,
        accuracy_gate: 0.8,
    },
    CurriculumPhase {
        id: "roots-prefixes",
        name: "Roots & Prefixes",
        description: "Building long words from prefixes and Latin or Greek roots.",
        tier: TIER_CHALLENGER,
        categories: &["prefixes", "latin-roots", "greek-roots"],
        mastery_gate: 265,
        accuracy_gate: 0.82,
    },
    CurriculumPhase {
        id: "spelling-bee",
        name: "Spelling Bee",
        description: "Loanwords and the words adults misspell most.",
        tier: TIER_CHALLENGER,
        categories: &["french-origin", "german-origin", "commonly-misspelled"],
        mastery_gate: 320,
        accuracy_gate: 0.85,
    },
];
