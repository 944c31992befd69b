#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Side length of the canonical reference array along every axis.
pub const REFERENCE_SIDE: usize = 3;

/// Number of axes of the canonical reference array.
pub const REFERENCE_RANK: usize = 3;

/// Value written into a tainted copy of the reference array while checking
/// that an extracted item was actually read from the input.
///
/// The reference array only ever holds the integers `0..27`, so the sentinel
/// can never be a legitimate answer. Changing the reference fill requires
/// revisiting this value.
pub const PROVENANCE_SENTINEL: f64 = -100.0;

/// Course source directories, relative to the repository root, that hold
/// convertible notebook/markdown material.
pub const DEFAULT_SOURCE_DIRS: &[&str] = &[
    "Module1_GettingStartedWithPython",
    "Module2_EssentialsOfPython",
    "Module2_EssentialsOfPython/Problems",
    "Module3_IntroducingNumpy",
    "Module3_IntroducingNumpy/Problems",
    "Module4_OOP",
    "Module5_OddsAndEnds",
];

/// Directory the published documentation is served from.
pub const DOCS_DIR: &str = "docs";

/// Directory the previous publication is moved to before replacement.
pub const DOCS_BACKUP_DIR: &str = "docs_backup";

/// Directory (relative to the root) containing a fresh sphinx build.
pub const SPHINX_BUILD_DIR: &str = "Python/_build";

/// Marker file GitHub Pages needs so it serves `_`-prefixed directories.
pub const NOJEKYLL_MARKER: &str = ".nojekyll";

/// Custom-domain marker file carried from the old docs to the new build.
pub const CNAME_FILE: &str = "CNAME";
