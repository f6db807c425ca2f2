//! The stage program: one flat opcode table holding every run mode's
//! sequence of generation stages.
//!
//! The iterator interprets this table and never branches on the run mode
//! itself, so a new mode is a new sequence here and nothing more.

use std::fmt;
use std::sync::OnceLock;

use tracing::debug;

/// One generation stage. `End` terminates every sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// All legal evasions, scored and sorted in one pass.
    LegalEvasion,
    /// The hash move.
    Trans,
    /// Captures classified good; bad ones are deferred.
    GoodCapture,
    /// The captures deferred by `GoodCapture`.
    BadCapture,
    /// Up to four killer moves.
    Killer,
    /// Remaining quiet moves by history.
    Quiet,
    /// Quiescence evasions.
    EvasionQs,
    /// Quiescence captures; bad ones are dropped.
    CaptureQs,
    /// Quiet checks that do not lose material.
    CheckQs,
    End,
}

impl Stage {
    /// Short lowercase name, as printed by the inspector shell.
    pub const fn name(self) -> &'static str {
        match self {
            Stage::LegalEvasion => "evasion",
            Stage::Trans => "trans",
            Stage::GoodCapture => "good-capture",
            Stage::BadCapture => "bad-capture",
            Stage::Killer => "killer",
            Stage::Quiet => "quiet",
            Stage::EvasionQs => "qs-evasion",
            Stage::CaptureQs => "qs-capture",
            Stage::CheckQs => "qs-check",
            Stage::End => "end",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run mode, selecting where in the program the cursor starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entry {
    LegalEvasion,
    Main,
    EvasionQs,
    CheckQs,
    CaptureQs,
}

impl Entry {
    pub const COUNT: usize = 5;

    pub const ALL: [Entry; Entry::COUNT] = [
        Entry::LegalEvasion,
        Entry::Main,
        Entry::EvasionQs,
        Entry::CheckQs,
        Entry::CaptureQs,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Flat opcode array with one start offset per [`Entry`].
#[derive(Debug)]
pub struct StageProgram {
    code: Vec<Stage>,
    entries: [usize; Entry::COUNT],
}

impl StageProgram {
    fn build() -> Self {
        let mut program = Self {
            code: Vec::with_capacity(16),
            entries: [0; Entry::COUNT],
        };
        program.append(Entry::LegalEvasion, &[Stage::LegalEvasion]);
        program.append(
            Entry::Main,
            &[Stage::Trans, Stage::GoodCapture, Stage::Killer, Stage::Quiet, Stage::BadCapture],
        );
        program.append(Entry::EvasionQs, &[Stage::EvasionQs]);
        program.append(Entry::CheckQs, &[Stage::CaptureQs, Stage::CheckQs]);
        program.append(Entry::CaptureQs, &[Stage::CaptureQs]);
        program
    }

    fn append(&mut self, entry: Entry, stages: &[Stage]) {
        debug_assert!(!stages.contains(&Stage::End));
        self.entries[entry.index()] = self.code.len();
        self.code.extend_from_slice(stages);
        self.code.push(Stage::End);
    }

    /// Program counter of the first stage of `entry`.
    #[inline]
    pub fn entry(&self, entry: Entry) -> usize {
        self.entries[entry.index()]
    }

    /// Opcode at `pc`; anything past the table reads as [`Stage::End`].
    #[inline]
    pub fn stage(&self, pc: usize) -> Stage {
        self.code.get(pc).copied().unwrap_or(Stage::End)
    }

    /// The stages of `entry`, without the terminator.
    pub fn sequence(&self, entry: Entry) -> &[Stage] {
        let start = self.entry(entry);
        let len = self.code[start..]
            .iter()
            .position(|&stage| stage == Stage::End)
            .unwrap_or(self.code.len() - start);
        &self.code[start..start + len]
    }
}

static PROGRAM: OnceLock<StageProgram> = OnceLock::new();

/// Build the process-wide stage program on first use and return it.
///
/// Safe to call from any thread, any number of times.
pub fn initialize_tables() -> &'static StageProgram {
    PROGRAM.get_or_init(|| {
        let program = StageProgram::build();
        debug!(opcodes = program.code.len(), "stage program built");
        program
    })
}
