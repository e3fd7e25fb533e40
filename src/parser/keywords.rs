//! YANG statement keyword constants (RFC 7950 §6.3, Table form).
//!
//! These are plain `&str` constants rather than a closed enum because
//! extension statements (`prefix:keyword`) are first-class in YANG: the
//! listener must recognize the built-in keywords and fall back to a
//! generic "unknown statement" node for anything else, rather than fail
//! to parse at all.

pub const MODULE: &str = "module";
pub const SUBMODULE: &str = "submodule";
pub const BELONGS_TO: &str = "belongs-to";
pub const NAMESPACE: &str = "namespace";
pub const PREFIX: &str = "prefix";
pub const YANG_VERSION: &str = "yang-version";
pub const IMPORT: &str = "import";
pub const INCLUDE: &str = "include";
pub const REVISION: &str = "revision";
pub const REVISION_DATE: &str = "revision-date";
pub const ORGANIZATION: &str = "organization";
pub const CONTACT: &str = "contact";
pub const DESCRIPTION: &str = "description";
pub const REFERENCE: &str = "reference";

pub const CONTAINER: &str = "container";
pub const LEAF: &str = "leaf";
pub const LEAF_LIST: &str = "leaf-list";
pub const LIST: &str = "list";
pub const CHOICE: &str = "choice";
pub const CASE: &str = "case";
pub const GROUPING: &str = "grouping";
pub const USES: &str = "uses";
pub const REFINE: &str = "refine";
pub const AUGMENT: &str = "augment";
pub const TYPEDEF: &str = "typedef";
pub const TYPE: &str = "type";
pub const IDENTITY: &str = "identity";
pub const BASE: &str = "base";
pub const FEATURE: &str = "feature";
pub const IF_FEATURE: &str = "if-feature";
pub const MUST: &str = "must";
pub const WHEN: &str = "when";
pub const DEFAULT: &str = "default";
pub const UNITS: &str = "units";
pub const MANDATORY: &str = "mandatory";
pub const CONFIG: &str = "config";
pub const KEY: &str = "key";
pub const UNIQUE: &str = "unique";
pub const MIN_ELEMENTS: &str = "min-elements";
pub const MAX_ELEMENTS: &str = "max-elements";
pub const ORDERED_BY: &str = "ordered-by";
pub const PRESENCE: &str = "presence";

pub const PATTERN: &str = "pattern";
pub const RANGE: &str = "range";
pub const LENGTH: &str = "length";
pub const ENUM: &str = "enum";
pub const BIT: &str = "bit";
pub const POSITION: &str = "position";
pub const VALUE: &str = "value";
pub const FRACTION_DIGITS: &str = "fraction-digits";
pub const PATH: &str = "path";
pub const REQUIRE_INSTANCE: &str = "require-instance";

pub const INPUT: &str = "input";
pub const OUTPUT: &str = "output";
pub const NOTIFICATION: &str = "notification";
pub const RPC: &str = "rpc";
pub const ACTION: &str = "action";
pub const ANYXML: &str = "anyxml";
pub const ANYDATA: &str = "anydata";
pub const STATUS: &str = "status";

pub const EXTENSION: &str = "extension";
pub const ARGUMENT_KW: &str = "argument";
pub const YIN_ELEMENT: &str = "yin-element";
pub const DEVIATION: &str = "deviation";
pub const DEVIATE: &str = "deviate";
pub const ERROR_MESSAGE: &str = "error-message";
pub const ERROR_APP_TAG: &str = "error-app-tag";

/// All built-in (non-extension) YANG statement keywords.
pub const BUILTIN_KEYWORDS: &[&str] = &[
    MODULE, SUBMODULE, BELONGS_TO, NAMESPACE, PREFIX, YANG_VERSION, IMPORT, INCLUDE, REVISION,
    REVISION_DATE, ORGANIZATION, CONTACT, DESCRIPTION, REFERENCE, CONTAINER, LEAF, LEAF_LIST,
    LIST, CHOICE, CASE, GROUPING, USES, REFINE, AUGMENT, TYPEDEF, TYPE, IDENTITY, BASE, FEATURE,
    IF_FEATURE, MUST, WHEN, DEFAULT, UNITS, MANDATORY, CONFIG, KEY, UNIQUE, MIN_ELEMENTS,
    MAX_ELEMENTS, ORDERED_BY, PRESENCE, PATTERN, RANGE, LENGTH, ENUM, BIT, POSITION, VALUE,
    FRACTION_DIGITS, PATH, REQUIRE_INSTANCE, INPUT, OUTPUT, NOTIFICATION, RPC, ACTION, ANYXML,
    ANYDATA, STATUS, EXTENSION, ARGUMENT_KW, YIN_ELEMENT, DEVIATION, DEVIATE, ERROR_MESSAGE,
    ERROR_APP_TAG,
];

pub fn is_builtin(keyword: &str) -> bool {
    BUILTIN_KEYWORDS.contains(&keyword)
}
