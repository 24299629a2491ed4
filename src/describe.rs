//! Classifier for `git describe` output.
//!
//! The runner invokes
//! `git describe --always --long --dirty=-modified --match v[0-9]*`, which
//! prints one of four shapes:
//!
//! | Descriptor                      | Checkout state  |
//! |---------------------------------|-----------------|
//! | `1a2b3c4`                       | untagged, clean |
//! | `1a2b3c4-modified`              | untagged, dirty |
//! | `v1.2.3-4-g1a2b3c4`             | tagged, clean   |
//! | `v1.2.3-4-g1a2b3c4-modified`    | tagged, dirty   |
//!
//! Anything else is reported as [`StructuredVersion::unrecognized`] so the
//! build can still proceed.

use std::sync::LazyLock;

use regex::{
    Captures,
    Regex,
};

use crate::version::{
    StructuredVersion,
    normalize_component,
    normalize_triple,
};

type Extractor = fn(&Captures<'_>) -> Option<StructuredVersion>;

/// One recognized descriptor shape.
struct Shape {
    name: &'static str,
    pattern: Regex,
    extract: Extractor,
}

const SHAPE_TABLE: [(&str, &str, Extractor); 4] = [
    ("untagged", r"^(?P<hash>[0-9a-f]{5,32})$", untagged_clean),
    (
        "untagged-modified",
        r"^(?P<hash>[0-9a-f]{5,32})-modified$",
        untagged_dirty,
    ),
    (
        "tagged",
        r"^v(?P<major>[0-9]+)\.(?P<minor>[0-9]+)\.(?P<patch>[0-9]+)-(?P<distance>[0-9]+)-g(?P<hash>[0-9a-f]+)$",
        tagged_clean,
    ),
    (
        "tagged-modified",
        r"^v(?P<major>[0-9]+)\.(?P<minor>[0-9]+)\.(?P<patch>[0-9]+)-(?P<distance>[0-9]+)-g(?P<hash>[0-9a-f]+)-modified$",
        tagged_dirty,
    ),
];

static SHAPES: LazyLock<Vec<Shape>> = LazyLock::new(|| {
    SHAPE_TABLE
        .iter()
        .filter_map(|&(name, pattern, extract)| {
            Regex::new(pattern).ok().map(|pattern| Shape {
                name,
                pattern,
                extract,
            })
        })
        .collect()
});

fn untagged_clean(caps: &Captures<'_>) -> Option<StructuredVersion> {
    Some(StructuredVersion::untagged(caps.name("hash")?.as_str(), false))
}

fn untagged_dirty(caps: &Captures<'_>) -> Option<StructuredVersion> {
    Some(StructuredVersion::untagged(caps.name("hash")?.as_str(), true))
}

fn tagged_clean(caps: &Captures<'_>) -> Option<StructuredVersion> {
    tagged(caps, false)
}

fn tagged_dirty(caps: &Captures<'_>) -> Option<StructuredVersion> {
    tagged(caps, true)
}

fn tagged(caps: &Captures<'_>, modified: bool) -> Option<StructuredVersion> {
    let (major, minor, patch) = normalize_triple(
        caps.name("major")?.as_str(),
        caps.name("minor")?.as_str(),
        caps.name("patch")?.as_str(),
    )
    .ok()?;
    let revision = normalize_component("revision", caps.name("distance")?.as_str()).ok()?;

    Some(StructuredVersion {
        major,
        minor,
        patch,
        revision,
        commit_id: caps.name("hash")?.as_str().to_string(),
        modified,
    })
}

/// Name of the first shape matching `descriptor`, if any.
pub fn shape_of(descriptor: &str) -> Option<&'static str> {
    SHAPES
        .iter()
        .find(|shape| shape.pattern.is_match(descriptor))
        .map(|shape| shape.name)
}

/// Classify one line of `git describe` output.
///
/// The first matching shape wins. A descriptor that matches no shape, or
/// whose numbers overflow, yields [`StructuredVersion::unrecognized`].
pub fn classify_describe(descriptor: &str) -> StructuredVersion {
    SHAPES
        .iter()
        .find_map(|shape| {
            shape
                .pattern
                .captures(descriptor)
                .map(|caps| (shape.extract)(&caps))
        })
        .flatten()
        .unwrap_or_else(StructuredVersion::unrecognized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_version(
        version: &StructuredVersion,
        expected: (&str, &str, &str, &str),
        commit_id: &str,
        modified: bool,
    ) {
        assert_eq!(
            (
                version.major.as_str(),
                version.minor.as_str(),
                version.patch.as_str(),
                version.revision.as_str()
            ),
            expected
        );
        assert_eq!(version.commit_id, commit_id);
        assert_eq!(version.modified, modified);
    }

    const HASHES: [&str; 6] = [
        "1a2b3",
        "1a2b3c4",
        "0000000",
        "deadbeefcafe",
        "a9ebd080a7b1c76a8b3f3080a7b1c7c7",
        "fffff",
    ];

    #[test]
    fn test_all_shapes_compile() {
        assert_eq!(SHAPES.len(), SHAPE_TABLE.len());
    }

    #[test]
    fn test_untagged_clean() {
        for hash in HASHES {
            let version = classify_describe(hash);
            assert_version(&version, ("0", "0", "0", "0"), hash, false);
            assert_eq!(version.modified_string(), "");
        }
    }

    #[test]
    fn test_untagged_dirty() {
        for hash in HASHES {
            let version = classify_describe(&format!("{hash}-modified"));
            assert_version(&version, ("0", "0", "0", "0"), hash, true);
            assert_eq!(version.modified_string(), " (Modified)");
        }
    }

    #[test]
    fn test_untagged_hash_length_bounds() {
        assert_eq!(classify_describe("1a2b"), StructuredVersion::unrecognized());
        let too_long = "a".repeat(33);
        assert_eq!(
            classify_describe(&too_long),
            StructuredVersion::unrecognized()
        );
        assert_eq!(
            classify_describe(&format!("{too_long}-modified")),
            StructuredVersion::unrecognized()
        );
    }

    #[test]
    fn test_untagged_rejects_uppercase_hash() {
        assert_eq!(
            classify_describe("1A2B3C4"),
            StructuredVersion::unrecognized()
        );
    }

    #[test]
    fn test_tagged_clean() {
        let cases = [
            ("v1.2.3-0-g1a2b3c4", ("1", "2", "3", "0")),
            ("v10.20.30-0-g1a2b3c4", ("10", "20", "30", "0")),
            ("v01.02.03-0-g1a2b3c4", ("1", "2", "3", "0")),
            ("v2.1.0-0-g1a2b3c4", ("2", "1", "0", "0")),
            ("v1.2.3-4-g1a2b3c4", ("1", "2", "3", "4")),
            ("v10.20.30-15-g1a2b3c4", ("10", "20", "30", "15")),
            ("v01.02.03-4-g1a2b3c4", ("1", "2", "3", "4")),
            ("v2.1.0-8-g1a2b3c4", ("2", "1", "0", "8")),
            ("v0.0.0-007-g1a2b3c4", ("0", "0", "0", "7")),
        ];
        for (descriptor, expected) in cases {
            let version = classify_describe(descriptor);
            assert_version(&version, expected, "1a2b3c4", false);
        }
    }

    #[test]
    fn test_tagged_dirty_flips_only_modified() {
        let descriptors = [
            "v1.2.3-0-g1a2b3c4",
            "v10.20.30-15-g1a2b3c4",
            "v01.02.03-4-g1a2b3c4",
            "v2.1.0-8-g1a2b3c4",
        ];
        for descriptor in descriptors {
            let clean = classify_describe(descriptor);
            let dirty = classify_describe(&format!("{descriptor}-modified"));
            assert!(!clean.modified);
            assert!(dirty.modified);
            assert_eq!(
                StructuredVersion {
                    modified: false,
                    ..dirty
                },
                clean
            );
        }
    }

    #[test]
    fn test_tagged_long_hash() {
        let version = classify_describe("v1.2.3-4-g1a2b3c4d");
        assert_version(&version, ("1", "2", "3", "4"), "1a2b3c4d", false);
    }

    #[test]
    fn test_numbers_with_leading_zeros() {
        for major in [0i32, 1, 7, 42, i32::MAX] {
            for distance in [0i32, 3, 120] {
                let descriptor = format!("v00{major}.0{major}.{major}-000{distance}-gabcdef0");
                let version = classify_describe(&descriptor);
                let m = major.to_string();
                let d = distance.to_string();
                assert_version(&version, (&m, &m, &m, &d), "abcdef0", false);
            }
        }
    }

    #[test]
    fn test_unrecognized_descriptors() {
        let descriptors = [
            "",
            "garbage",
            "v1.2-0-gabc",
            "v1.2.3",
            "v1.2.3-4",
            "1.2.3-4-gabc1234",
            "v1.2.3-4-gabc1234-dirty",
            "v1.2.3-rc1-4-gabc1234",
            "V1.2.3-4-gabc1234",
            "v1.2.3-4-gABC1234",
            "v1.2.3-4-g",
            " 1a2b3c4",
            "1a2b3c4\n",
            "1a2b3c4-modified-modified",
        ];
        for descriptor in descriptors {
            let version = classify_describe(descriptor);
            assert_version(&version, ("0", "0", "0", "1"), "", true);
            assert_eq!(shape_of(descriptor), None, "{descriptor:?}");
        }
    }

    #[test]
    fn test_overflow_falls_back() {
        for descriptor in [
            "v2147483648.0.0-0-g1a2b3c4",
            "v1.2147483648.0-0-g1a2b3c4",
            "v1.0.2147483648-0-g1a2b3c4-modified",
            "v1.0.0-2147483648-g1a2b3c4",
            "v4294967296.0.0-0-g1a2b3c4",
        ] {
            assert_eq!(
                classify_describe(descriptor),
                StructuredVersion::unrecognized(),
                "{descriptor}"
            );
        }
        let version = classify_describe("v1.0.0-99999999999-g1a2b3c4-modified");
        assert_eq!(version, StructuredVersion::unrecognized());
    }

    #[test]
    fn test_largest_component_is_accepted() {
        let version = classify_describe("v2147483647.0.0-2147483647-g1a2b3c4");
        assert_version(
            &version,
            ("2147483647", "0", "0", "2147483647"),
            "1a2b3c4",
            false,
        );
    }

    #[test]
    fn test_all_hex_tag_shape_is_untagged() {
        // Short hex strings take the untagged shape even when they look numeric.
        let version = classify_describe("12345");
        assert_version(&version, ("0", "0", "0", "0"), "12345", false);
        assert_eq!(shape_of("12345"), Some("untagged"));
    }

    #[test]
    fn test_shape_of() {
        assert_eq!(shape_of("1a2b3c4-modified"), Some("untagged-modified"));
        assert_eq!(shape_of("v1.2.3-4-g1a2b3c4"), Some("tagged"));
        assert_eq!(
            shape_of("v1.2.3-4-g1a2b3c4-modified"),
            Some("tagged-modified")
        );
    }

    #[test]
    fn test_classification_is_idempotent() {
        for descriptor in ["1a2b3c4", "v01.2.3-4-gabc-modified", "garbage"] {
            assert_eq!(classify_describe(descriptor), classify_describe(descriptor));
        }
    }
}
