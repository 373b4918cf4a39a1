// src/decompose.rs
//! Build-name decomposition.
//!
//! CDash build names pack platform metadata into `/`-separated segments, e.g.
//! `x86_64/suse-es-15-sp6/cmpich-8.1.31/cce-18.0.1/2.0.0-2`. A [`NameLayout`] says how
//! to read them:
//!
//! - [`NameLayout::Positional4`]: segments 0..3 are `version, mpi, compiler, os`, taken
//!   verbatim whatever they contain.
//! - [`NameLayout::Positional5`]: exactly five segments are `arch, os, mpi, compiler,
//!   version`. Any other count goes through [`classify`], an ordered rule list with a
//!   fill-the-gaps post-pass.
//!
//! Decomposition is total: every field of the result is populated, with
//! [`UNKNOWN`](crate::config::consts::UNKNOWN) standing in for anything missing.

use crate::config::consts::UNKNOWN;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Arch,
    Os,
    Mpi,
    Compiler,
    Version,
}

impl Field {
    /// Column name used in CSV headers.
    pub fn name(self) -> &'static str {
        match self {
            Field::Arch => "arch",
            Field::Os => "os",
            Field::Mpi => "mpi",
            Field::Compiler => "compiler",
            Field::Version => "version",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        FILL_ORDER.into_iter().find(|f| f.name() == name)
    }
}

/// Order in which leftover segments fill empty fields.
pub const FILL_ORDER: [Field; 5] = [Field::Arch, Field::Os, Field::Mpi, Field::Compiler, Field::Version];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameLayout {
    Positional4,
    Positional5,
}

impl NameLayout {
    /// Name fields this layout persists, in column order.
    pub fn fields(self) -> &'static [Field] {
        match self {
            NameLayout::Positional4 => &[Field::Version, Field::Mpi, Field::Compiler, Field::Os],
            NameLayout::Positional5 => &FILL_ORDER,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameFields {
    pub arch: String,
    pub os: String,
    pub mpi: String,
    pub compiler: String,
    pub version: String,
}

impl Default for NameFields {
    fn default() -> Self {
        Self {
            arch: s!(UNKNOWN),
            os: s!(UNKNOWN),
            mpi: s!(UNKNOWN),
            compiler: s!(UNKNOWN),
            version: s!(UNKNOWN),
        }
    }
}

impl NameFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Arch => &self.arch,
            Field::Os => &self.os,
            Field::Mpi => &self.mpi,
            Field::Compiler => &self.compiler,
            Field::Version => &self.version,
        }
    }

    /// Set a field; blank values collapse to `unknown`.
    pub fn set(&mut self, field: Field, value: &str) {
        let value = value.trim();
        let value = if value.is_empty() { s!(UNKNOWN) } else { s!(value) };
        match field {
            Field::Arch => self.arch = value,
            Field::Os => self.os = value,
            Field::Mpi => self.mpi = value,
            Field::Compiler => self.compiler = value,
            Field::Version => self.version = value,
        }
    }
}

/* ---------------- Classifier rules ---------------- */

const ARCH_WORDS: &[&str] = &["x86_64", "x86-64", "amd64", "aarch64", "arm64", "ppc64le", "ppc64", "i686"];

const OS_WORDS: &[&str] = &[
    "linux", "suse", "sles", "rhel", "centos", "rocky", "alma", "ubuntu", "debian", "fedora",
    "toss", "macos", "darwin", "windows",
];

const MPI_WORDS: &[&str] = &["mpich", "openmpi", "ompi", "mvapich", "spectrum", "impi", "mpi"];

const COMPILER_WORDS: &[&str] = &[
    "gcc", "gnu", "clang", "cce", "intel", "icx", "icc", "oneapi", "nvhpc", "pgi", "xl",
    "aocc", "rocm", "amdclang", "msvc",
];

/// Segments that look like versions but are really OS releases.
const OS_EXCLUDE: &[&str] = &["-sp", "rhel", "sles", "suse", "linux", "ubuntu", "centos", "rocky", "toss"];

#[derive(Clone, Copy, Debug)]
pub enum Matcher {
    /// Case-insensitive substring match against any keyword.
    Keywords(&'static [&'static str]),
    /// Has a digit and a `.` or `-`, and no OS-exclusion keyword.
    VersionLike,
}

impl Matcher {
    pub fn matches(self, segment: &str) -> bool {
        let lc = segment.to_ascii_lowercase();
        match self {
            Matcher::Keywords(words) => words.iter().any(|w| lc.contains(w)),
            Matcher::VersionLike => {
                lc.chars().any(|c| c.is_ascii_digit())
                    && (lc.contains('.') || lc.contains('-'))
                    && !OS_EXCLUDE.iter().any(|w| lc.contains(w))
            }
        }
    }
}

pub struct Rule {
    pub field: Field,
    pub matcher: Matcher,
}

/// Tested in order; a segment goes to the first rule that matches and whose field is free.
pub const RULES: [Rule; 5] = [
    Rule { field: Field::Arch, matcher: Matcher::Keywords(ARCH_WORDS) },
    Rule { field: Field::Os, matcher: Matcher::Keywords(OS_WORDS) },
    Rule { field: Field::Mpi, matcher: Matcher::Keywords(MPI_WORDS) },
    Rule { field: Field::Compiler, matcher: Matcher::Keywords(COMPILER_WORDS) },
    Rule { field: Field::Version, matcher: Matcher::VersionLike },
];

/// The first rule that takes `segment`, given which fields are already taken.
pub fn classify_segment(segment: &str, taken: &[Field]) -> Option<Field> {
    RULES
        .iter()
        .find(|r| !taken.contains(&r.field) && r.matcher.matches(segment))
        .map(|r| r.field)
}

/// Content-based decomposition for segment lists of any length.
pub fn classify(segments: &[&str]) -> NameFields {
    let mut taken: Vec<Field> = Vec::with_capacity(FILL_ORDER.len());
    let mut fields = NameFields::default();
    let mut leftovers: Vec<&str> = Vec::new();

    for seg in segments.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        match classify_segment(seg, &taken) {
            Some(field) => {
                fields.set(field, seg);
                taken.push(field);
            }
            None => leftovers.push(seg),
        }
    }

    let empty = FILL_ORDER.into_iter().filter(|f| !taken.contains(f));
    for (field, seg) in empty.zip(leftovers) {
        fields.set(field, seg);
    }

    fields
}

fn positional(segments: &[&str], order: &[Field]) -> NameFields {
    let mut fields = NameFields::default();
    for (field, seg) in order.iter().zip(segments) {
        fields.set(*field, seg);
    }
    fields
}

/// Split a build name into its fields. Never fails.
pub fn decompose(layout: NameLayout, build_name: &str) -> NameFields {
    if build_name.trim().is_empty() {
        return NameFields::default();
    }
    let segments: Vec<&str> = build_name.split('/').collect();

    match layout {
        NameLayout::Positional4 => positional(&segments, layout.fields()),
        NameLayout::Positional5 if segments.len() == 5 => positional(&segments, layout.fields()),
        NameLayout::Positional5 => classify(&segments),
    }
}
