//! Function classifier - resolves a function's kind and modifiers
//!
//! Raw compiler attribute tokens are first lowered into the closed
//! [`Attribute`] set; tokens outside it are kept verbatim but play no part in
//! classification. The kind is then decided by [`RULES`], an ordered list
//! evaluated top to bottom where the first matching rule wins:
//!
//! | # | rule                 | condition                              | kind    |
//! |---|----------------------|----------------------------------------|---------|
//! | 1 | `public-constructor` | name is `constructor` and tagged public | public  |
//! | 2 | `constructor`        | name is `constructor`                  | private |
//! | 3 | `unconstrained`      | `is_unconstrained` flag set            | utility |
//! | 4 | `public-attribute`   | tagged public                          | public  |
//! | 5 | `utility-attribute`  | tagged utility                         | utility |
//! | 6 | `private-attribute`  | tagged private                         | private |
//! | 7 | `default`            | always                                 | private |
//!
//! A function resolved to `utility` loses its `public` token. Modifiers are
//! plain membership tests and ignore the rule chain.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Name that marks a function as the contract constructor
pub const CONSTRUCTOR_NAME: &str = "constructor";

/// Canonical function kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionType {
    Public,
    Private,
    Utility,
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FunctionType::Public => write!(f, "public"),
            FunctionType::Private => write!(f, "private"),
            FunctionType::Utility => write!(f, "utility"),
        }
    }
}

/// Recognized compiler attribute tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    Public,
    Private,
    Internal,
    Static,
    Initializer,
    Utility,
}

impl Attribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Public => "public",
            Attribute::Private => "private",
            Attribute::Internal => "internal",
            Attribute::Static => "static",
            Attribute::Initializer => "initializer",
            Attribute::Utility => "utility",
        }
    }
}

impl FromStr for Attribute {
    type Err = ();

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "public" => Ok(Attribute::Public),
            "private" => Ok(Attribute::Private),
            "internal" => Ok(Attribute::Internal),
            "static" => Ok(Attribute::Static),
            "initializer" => Ok(Attribute::Initializer),
            "utility" => Ok(Attribute::Utility),
            _ => Err(()),
        }
    }
}

/// Raw attribute tokens split into recognized and unrecognized
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    recognized: Vec<Attribute>,
    unrecognized: Vec<String>,
}

impl Attributes {
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut attributes = Attributes::default();
        for token in tokens {
            let token = token.as_ref();
            match token.parse::<Attribute>() {
                Ok(attr) => {
                    if !attributes.recognized.contains(&attr) {
                        attributes.recognized.push(attr);
                    }
                }
                Err(()) => attributes.unrecognized.push(token.to_string()),
            }
        }
        attributes
    }

    pub fn contains(&self, attr: Attribute) -> bool {
        self.recognized.contains(&attr)
    }

    pub fn unrecognized(&self) -> &[String] {
        &self.unrecognized
    }
}

/// Inputs the rule chain inspects
#[derive(Debug, Clone, Copy)]
pub struct FunctionFacts<'a> {
    pub is_constructor: bool,
    pub is_unconstrained: bool,
    pub attributes: &'a Attributes,
}

/// One step of the classification precedence chain
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&FunctionFacts) -> bool,
    pub kind: FunctionType,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

fn is_public_constructor(f: &FunctionFacts) -> bool {
    f.is_constructor && f.attributes.contains(Attribute::Public)
}

fn is_constructor(f: &FunctionFacts) -> bool {
    f.is_constructor
}

fn has_public(f: &FunctionFacts) -> bool {
    f.attributes.contains(Attribute::Public)
}

fn is_unconstrained(f: &FunctionFacts) -> bool {
    f.is_unconstrained
}

fn has_utility(f: &FunctionFacts) -> bool {
    f.attributes.contains(Attribute::Utility)
}

fn has_private(f: &FunctionFacts) -> bool {
    f.attributes.contains(Attribute::Private)
}

fn always(_: &FunctionFacts) -> bool {
    true
}

/// Classification precedence, first match wins. The last rule always matches.
pub const RULES: &[Rule] = &[
    Rule {
        name: "public-constructor",
        matches: is_public_constructor,
        kind: FunctionType::Public,
    },
    Rule {
        name: "constructor",
        matches: is_constructor,
        kind: FunctionType::Private,
    },
    Rule {
        name: "unconstrained",
        matches: is_unconstrained,
        kind: FunctionType::Utility,
    },
    Rule {
        name: "public-attribute",
        matches: has_public,
        kind: FunctionType::Public,
    },
    Rule {
        name: "utility-attribute",
        matches: has_utility,
        kind: FunctionType::Utility,
    },
    Rule {
        name: "private-attribute",
        matches: has_private,
        kind: FunctionType::Private,
    },
    Rule {
        name: "default",
        matches: always,
        kind: FunctionType::Private,
    },
];

/// Independent attribute flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub is_internal: bool,
    pub is_static: bool,
    pub is_initializer: bool,
}

/// Outcome of classifying one function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub function_type: FunctionType,
    pub modifiers: Modifiers,
    /// Raw tokens that survive classification, in input order
    pub attributes: Vec<String>,
    /// Name of the rule that decided `function_type`
    pub rule: &'static str,
    /// Tokens outside the recognized set
    pub unrecognized: Vec<String>,
    /// Whether a `public` token was removed because the kind is utility
    pub dropped_public: bool,
}

/// Classify a function from its name, raw attribute tokens, and unconstrained flag
pub fn classify<S: AsRef<str>>(name: &str, tokens: &[S], is_unconstrained: bool) -> Classification {
    let attributes = Attributes::from_tokens(tokens);
    let facts = FunctionFacts {
        is_constructor: name == CONSTRUCTOR_NAME,
        is_unconstrained,
        attributes: &attributes,
    };

    let rule = RULES
        .iter()
        .find(|rule| (rule.matches)(&facts))
        .unwrap_or(&RULES[RULES.len() - 1]);

    let mut retained: Vec<String> = tokens.iter().map(|t| t.as_ref().to_string()).collect();
    let mut dropped_public = false;
    if rule.kind == FunctionType::Utility {
        let before = retained.len();
        retained.retain(|t| t != Attribute::Public.as_str());
        dropped_public = retained.len() != before;
    }

    let trimmed = Attributes::from_tokens(&retained);
    let modifiers = Modifiers {
        is_internal: trimmed.contains(Attribute::Internal),
        is_static: trimmed.contains(Attribute::Static),
        is_initializer: trimmed.contains(Attribute::Initializer),
    };

    Classification {
        function_type: rule.kind,
        modifiers,
        attributes: retained,
        rule: rule.name,
        unrecognized: attributes.unrecognized().to_vec(),
        dropped_public,
    }
}
