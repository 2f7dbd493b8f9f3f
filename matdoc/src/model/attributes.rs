// matdoc - structured documentation for MATLAB source trees.
// Copyright (C) 2025 matdoc contributors.
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later
// version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <http://www.gnu.org/licenses/>.

//! Attribute vocabularies for class definitions.

use std::fmt::{Display, Formatter, Result as FmtResult};

use indexmap::IndexMap;
use serde::Serialize;
use unicase::UniCase;

/// Attributes in declaration order, keyed by canonical name.
pub type Attributes = IndexMap<String, AttrValue>;

/// The value of one attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// `true` or `false`, or an attribute named without a value.
    Bool(bool),

    /// One or more adjacent string literals, concatenated, without quotes.
    String(String),

    /// `{a, b, ...}`.
    List(Vec<String>),

    /// A name, possibly dotted or `?`-prefixed, such as `private` or
    /// `?pkg.Friend`, or a number.
    Name(String),
}

impl Display for AttrValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            AttrValue::List(items) => write!(f, "{{{}}}", items.join(", ")),
            AttrValue::Name(name) => write!(f, "{name}"),
        }
    }
}

/// The kind of value that an attribute takes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AttrKind {
    Bool,

    /// Text, such as a description.
    String,

    /// Access level: a name like `public`, a `?`-prefixed metaclass, or a
    /// list of metaclasses.
    Access,

    /// A metaclass or a list of them.
    Classes,

    /// A list, such as test tags.
    List,

    /// A name.
    Name,

    /// A number.
    Number,
}

impl AttrKind {
    /// Returns true if `value` has the form this kind expects.
    pub fn accepts(&self, value: &AttrValue) -> bool {
        match (self, value) {
            (AttrKind::Bool, AttrValue::Bool(_)) => true,
            (AttrKind::String, AttrValue::String(_)) => true,
            (AttrKind::Access | AttrKind::Classes, AttrValue::Name(_) | AttrValue::List(_)) => {
                true
            }
            (AttrKind::List, AttrValue::List(_)) => true,
            (AttrKind::List, AttrValue::String(_)) => true,
            (AttrKind::Name, AttrValue::Name(_)) => true,
            (AttrKind::Number, AttrValue::Name(name)) => name.parse::<f64>().is_ok(),
            _ => false,
        }
    }
}

impl Display for AttrKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            AttrKind::Bool => "a logical value",
            AttrKind::String => "a string",
            AttrKind::Access => "an access level",
            AttrKind::Classes => "a list of classes",
            AttrKind::List => "a list",
            AttrKind::Name => "a name",
            AttrKind::Number => "a number",
        };
        f.write_str(s)
    }
}

/// The closed set of attributes that one kind of declaration accepts.
#[derive(Debug)]
pub struct Vocabulary {
    /// The kind of declaration, for messages, e.g. `property`.
    pub name: &'static str,

    /// Canonical attribute names and their kinds.
    pub attributes: &'static [(&'static str, AttrKind)],
}

impl Vocabulary {
    /// Looks up `name` case-insensitively, returning its canonical spelling
    /// and kind.
    pub fn lookup(&self, name: &str) -> Option<(&'static str, AttrKind)> {
        let name = UniCase::new(name);
        self.attributes
            .iter()
            .find(|(canonical, _)| UniCase::new(*canonical) == name)
            .copied()
    }
}

pub static CLASS_ATTRIBUTES: Vocabulary = Vocabulary {
    name: "class",
    attributes: &[
        ("Abstract", AttrKind::Bool),
        ("AllowedSubclasses", AttrKind::Classes),
        ("ConstructOnLoad", AttrKind::Bool),
        ("HandleCompatible", AttrKind::Bool),
        ("Hidden", AttrKind::Bool),
        ("InferiorClasses", AttrKind::Classes),
        ("Sealed", AttrKind::Bool),
        ("Description", AttrKind::String),
        ("DetailedDescription", AttrKind::String),
        ("Framework", AttrKind::Name),
    ],
};

pub static PROPERTY_ATTRIBUTES: Vocabulary = Vocabulary {
    name: "property",
    attributes: &[
        ("AbortSet", AttrKind::Bool),
        ("Abstract", AttrKind::Bool),
        ("Access", AttrKind::Access),
        ("Constant", AttrKind::Bool),
        ("Dependent", AttrKind::Bool),
        ("GetAccess", AttrKind::Access),
        ("GetObservable", AttrKind::Bool),
        ("Hidden", AttrKind::Bool),
        ("NonCopyable", AttrKind::Bool),
        ("PartialMatchPriority", AttrKind::Number),
        ("SetAccess", AttrKind::Access),
        ("SetObservable", AttrKind::Bool),
        ("Transient", AttrKind::Bool),
        ("ClassSetupParameter", AttrKind::Bool),
        ("MethodSetupParameter", AttrKind::Bool),
        ("TestParameter", AttrKind::Bool),
        ("Description", AttrKind::String),
        ("DetailedDescription", AttrKind::String),
    ],
};

pub static METHOD_ATTRIBUTES: Vocabulary = Vocabulary {
    name: "method",
    attributes: &[
        ("Abstract", AttrKind::Bool),
        ("Access", AttrKind::Access),
        ("Hidden", AttrKind::Bool),
        ("Sealed", AttrKind::Bool),
        ("Static", AttrKind::Bool),
        ("Test", AttrKind::Bool),
        ("TestClassSetup", AttrKind::Bool),
        ("TestMethodSetup", AttrKind::Bool),
        ("TestClassTeardown", AttrKind::Bool),
        ("TestMethodTeardown", AttrKind::Bool),
        ("ParameterCombination", AttrKind::String),
        ("TestTags", AttrKind::List),
        ("Description", AttrKind::String),
        ("DetailedDescription", AttrKind::String),
    ],
};

pub static EVENT_ATTRIBUTES: Vocabulary = Vocabulary {
    name: "events",
    attributes: &[
        ("Hidden", AttrKind::Bool),
        ("ListenAccess", AttrKind::Access),
        ("NotifyAccess", AttrKind::Access),
        ("Description", AttrKind::String),
        ("DetailedDescription", AttrKind::String),
    ],
};

pub static ENUMERATION_ATTRIBUTES: Vocabulary = Vocabulary {
    name: "enumeration",
    attributes: &[("Hidden", AttrKind::Bool)],
};

pub static ARGUMENTS_ATTRIBUTES: Vocabulary = Vocabulary {
    name: "arguments",
    attributes: &[
        ("Input", AttrKind::Bool),
        ("Output", AttrKind::Bool),
        ("Repeating", AttrKind::Bool),
    ],
};

#[cfg(test)]
mod tests {
    use super::{AttrKind, AttrValue, METHOD_ATTRIBUTES, PROPERTY_ATTRIBUTES};

    #[test]
    fn case_insensitive_lookup() {
        assert_eq!(
            PROPERTY_ATTRIBUTES.lookup("setaccess"),
            Some(("SetAccess", AttrKind::Access))
        );
        assert_eq!(PROPERTY_ATTRIBUTES.lookup("Static"), None);
        assert_eq!(METHOD_ATTRIBUTES.lookup("STATIC"), Some(("Static", AttrKind::Bool)));
    }

    #[test]
    fn kinds() {
        assert!(AttrKind::Access.accepts(&AttrValue::Name(String::from("private"))));
        assert!(AttrKind::Access.accepts(&AttrValue::List(vec![String::from("?A")])));
        assert!(!AttrKind::Bool.accepts(&AttrValue::Name(String::from("private"))));
        assert!(AttrKind::Number.accepts(&AttrValue::Name(String::from("2"))));
        assert!(!AttrKind::Number.accepts(&AttrValue::Name(String::from("two"))));
    }

    #[test]
    fn display() {
        assert_eq!(AttrValue::String(String::from("it's")).to_string(), "'it''s'");
        assert_eq!(
            AttrValue::List(vec![String::from("?A"), String::from("?B")]).to_string(),
            "{?A, ?B}"
        );
    }
}
