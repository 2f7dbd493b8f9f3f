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

//! The documentation model.
//!
//! Parsing a source unit yields an [Entity].  Entities are immutable once
//! built, except for two lazily computed fields: the members of a [Module]
//! and the resolved bases of a [Class].  Both are computed on first use
//! through a [Resolver] and then kept.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    sync::{Arc, OnceLock},
};

use indexmap::IndexMap;
use log::warn;
use serde::{Serialize, Serializer};

use crate::{
    message::{Diagnostic, Location},
    resolve::Resolver,
};

pub mod attributes;

pub use attributes::{AttrKind, AttrValue, Attributes, Vocabulary};

/// What every documented declaration provides.
pub trait Documented {
    /// The declaration's name.
    fn name(&self) -> &str;

    /// The docstring, or `None` if there is none.  A docstring is never
    /// empty.
    fn doc(&self) -> Option<&str>;

    /// Dotted name of the namespace that owns the declaration.
    fn module(&self) -> &str;
}

/// Converts an empty docstring to `None`.
pub fn normalize_doc(doc: Option<String>) -> Option<String> {
    doc.filter(|doc| !doc.is_empty())
}

/// One entry in a size specification such as `(1,:)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dimension {
    Fixed(u64),

    /// `:`
    Any,
}

impl Serialize for Dimension {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Dimension::Fixed(n) => serializer.serialize_u64(*n),
            Dimension::Any => serializer.serialize_str(":"),
        }
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Dimension::Fixed(n) => write!(f, "{n}"),
            Dimension::Any => write!(f, ":"),
        }
    }
}

/// Validation and documentation for one function argument or return value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ArgSpec {
    pub size: Option<Vec<Dimension>>,
    pub type_name: Option<String>,
    pub validators: Option<Vec<String>>,
    pub default: Option<String>,
    pub docstring: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Argument {
    pub name: String,
    #[serde(flatten)]
    pub spec: ArgSpec,
}

/// Function arguments or return values, in declaration order.
///
/// Names need not be unique: each `~` placeholder keeps its own position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Arguments(Vec<Argument>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>) {
        self.0.push(Argument {
            name: name.into(),
            spec: ArgSpec::default(),
        });
    }

    /// Returns the first argument named `name`.
    pub fn get(&self, name: &str) -> Option<&ArgSpec> {
        self.0
            .iter()
            .find(|argument| argument.name == name)
            .map(|argument| &argument.spec)
    }

    /// Returns the spec for `name`, adding an argument with that name at the
    /// end if there is none yet.
    pub fn get_or_push(&mut self, name: &str) -> &mut ArgSpec {
        let index = match self.0.iter().position(|argument| argument.name == name) {
            Some(index) => index,
            None => {
                self.push(name);
                self.0.len() - 1
            }
        };
        &mut self.0[index].spec
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|argument| argument.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Argument> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S> FromIterator<S> for Arguments
where
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut arguments = Self::new();
        for name in iter {
            arguments.push(name);
        }
        arguments
    }
}

/// A function, either standing alone in its own file or as the
/// implementation of a [Method].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Function {
    pub name: String,
    pub namespace: String,
    pub docstring: Option<String>,
    pub args: Arguments,
    pub retv: Arguments,
}

impl Documented for Function {
    fn name(&self) -> &str {
        &self.name
    }

    fn doc(&self) -> Option<&str> {
        self.docstring.as_deref()
    }

    fn module(&self) -> &str {
        &self.namespace
    }
}

/// A function that belongs to a class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Method {
    #[serde(flatten)]
    pub function: Function,
    pub attrs: Attributes,

    /// Name of the owning class.
    pub class: String,
}

impl Method {
    /// Creates a method.  Accessor names like `get.Value` become
    /// `get_Value`.
    pub fn new(mut function: Function, attrs: Attributes, class: impl Into<String>) -> Self {
        function.name = function.name.replace('.', "_");
        Self {
            function,
            attrs,
            class: class.into(),
        }
    }

    pub fn is_static(&self) -> bool {
        self.attrs.get("Static") == Some(&AttrValue::Bool(true))
    }
}

impl Documented for Method {
    fn name(&self) -> &str {
        &self.function.name
    }

    fn doc(&self) -> Option<&str> {
        self.function.docstring.as_deref()
    }

    fn module(&self) -> &str {
        &self.function.namespace
    }
}

/// A class property.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Property {
    pub name: String,

    /// Name of the owning class.
    pub class: String,

    #[serde(skip)]
    pub namespace: String,

    pub attrs: Attributes,
    pub size: Option<Vec<Dimension>>,
    pub type_name: Option<String>,
    pub validators: Option<Vec<String>>,

    /// Source text of the default value, not evaluated.
    pub default: Option<String>,

    pub docstring: Option<String>,
}

impl Documented for Property {
    fn name(&self) -> &str {
        &self.name
    }

    fn doc(&self) -> Option<&str> {
        self.docstring.as_deref()
    }

    fn module(&self) -> &str {
        &self.namespace
    }
}

/// A class member found by [Class::member].
#[derive(Copy, Clone, Debug)]
pub enum Member<'a> {
    Property(&'a Property),
    Method(&'a Method),
}

impl Member<'_> {
    pub fn docstring(&self) -> Option<&str> {
        match self {
            Member::Property(property) => property.doc(),
            Member::Method(method) => method.doc(),
        }
    }
}

/// A `classdef` class.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Class {
    pub name: String,
    pub namespace: String,
    pub attrs: Attributes,

    /// Superclasses as written in the source, in order.
    pub superclass_names: Vec<String>,

    pub docstring: Option<String>,
    pub properties: IndexMap<String, Property>,
    pub methods: IndexMap<String, Method>,

    /// Where the `classdef` line is.
    #[serde(skip)]
    pub location: Location,

    #[serde(skip)]
    bases: OnceLock<Vec<Arc<Class>>>,
}

/// Superclasses that are part of MATLAB itself and so never found in a
/// source tree.
fn is_builtin_class(name: &str) -> bool {
    name == "handle" || name.starts_with("matlab.")
}

impl Class {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            attrs: Attributes::new(),
            superclass_names: Vec::new(),
            docstring: None,
            properties: IndexMap::new(),
            methods: IndexMap::new(),
            location: Location::default(),
            bases: OnceLock::new(),
        }
    }

    pub fn full_name(&self) -> String {
        join_name(&self.namespace, &self.name)
    }

    /// Looks up a member by name.  Properties take precedence over methods.
    pub fn member(&self, name: &str) -> Option<Member<'_>> {
        self.properties
            .get(name)
            .map(Member::Property)
            .or_else(|| self.methods.get(name).map(Member::Method))
    }

    /// Returns the superclasses that `resolver` can find, in declaration
    /// order.  The result is computed once and then kept.  Superclasses that
    /// cannot be found are omitted, with a warning unless they are part of
    /// MATLAB itself.
    pub fn bases(&self, resolver: &Resolver) -> &[Arc<Class>] {
        self.bases.get_or_init(|| {
            let mut bases = Vec::with_capacity(self.superclass_names.len());
            for name in &self.superclass_names {
                match resolver.resolve(name, Some(&self.namespace)) {
                    Some(Entity::Class(class)) => bases.push(class),
                    Some(other) => {
                        let text = format!(
                            "superclass `{name}` of `{}` is a {}, not a class",
                            self.full_name(),
                            other.kind()
                        );
                        warn!("{text}");
                        resolver.record(Diagnostic::warning(self.location.clone(), text));
                    }
                    None if is_builtin_class(name) => {
                        log::debug!("{}: built-in superclass `{name}`", self.full_name());
                    }
                    None => {
                        let text = format!(
                            "superclass `{name}` of `{}` not found",
                            self.full_name()
                        );
                        warn!("{text}");
                        resolver.record(Diagnostic::warning(self.location.clone(), text));
                    }
                }
            }
            bases
        })
    }
}

impl Documented for Class {
    fn name(&self) -> &str {
        &self.name
    }

    fn doc(&self) -> Option<&str> {
        self.docstring.as_deref()
    }

    fn module(&self) -> &str {
        &self.namespace
    }
}

/// A file of statements with no `function` or `classdef` declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Script {
    pub name: String,
    pub namespace: String,

    /// The comment block at the top of the file.
    pub docstring: Option<String>,

    /// The source text, unparsed.
    pub body: String,
}

impl Documented for Script {
    fn name(&self) -> &str {
        &self.name
    }

    fn doc(&self) -> Option<&str> {
        self.docstring.as_deref()
    }

    fn module(&self) -> &str {
        &self.namespace
    }
}

/// An App Designer application (`.mlapp` file).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Application {
    pub name: String,
    pub namespace: String,
    pub docstring: Option<String>,
}

impl Documented for Application {
    fn name(&self) -> &str {
        &self.name
    }

    fn doc(&self) -> Option<&str> {
        self.docstring.as_deref()
    }

    fn module(&self) -> &str {
        &self.namespace
    }
}

/// A folder of source files, that is, a plain folder or a `+package`.
#[derive(Debug, Serialize)]
pub struct Module {
    /// Dotted name relative to the source root, e.g. `target.+pkg`, or the
    /// empty string for the root itself.
    pub name: String,

    pub path: PathBuf,

    /// From the folder's `Contents.m`, if any.
    pub docstring: Option<String>,

    #[serde(skip)]
    members: OnceLock<IndexMap<String, Entity>>,
}

impl PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.path == other.path && self.docstring == other.docstring
    }
}

impl Module {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        docstring: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            docstring,
            members: OnceLock::new(),
        }
    }

    /// The module's members in directory order, read from the file system
    /// on first use.
    pub fn members(&self, resolver: &Resolver) -> &IndexMap<String, Entity> {
        self.members.get_or_init(|| resolver.load_members(self))
    }

    pub fn get(&self, resolver: &Resolver, name: &str) -> Option<Entity> {
        self.members(resolver).get(name).cloned()
    }

    pub fn full_name(&self) -> &str {
        &self.name
    }

    /// Names of public members, that is, all of them except `private`
    /// folders.
    pub fn all(&self, resolver: &Resolver) -> Vec<String> {
        self.members(resolver)
            .keys()
            .filter(|name| *name != "private")
            .cloned()
            .collect()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Dotted name of the enclosing module, empty at the top level.
    pub fn package(&self) -> &str {
        self.name.rsplit_once('.').map_or("", |(package, _)| package)
    }
}

impl Documented for Module {
    fn name(&self) -> &str {
        &self.name
    }

    fn doc(&self) -> Option<&str> {
        self.docstring.as_deref()
    }

    fn module(&self) -> &str {
        self.package()
    }
}

/// Anything that a source tree documents.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Entity {
    Module(Arc<Module>),
    Class(Arc<Class>),
    Function(Arc<Function>),
    Script(Arc<Script>),
    Application(Arc<Application>),
}

impl Entity {
    pub fn kind(&self) -> &'static str {
        match self {
            Entity::Module(_) => "module",
            Entity::Class(_) => "class",
            Entity::Function(_) => "function",
            Entity::Script(_) => "script",
            Entity::Application(_) => "application",
        }
    }

    fn documented(&self) -> &dyn Documented {
        match self {
            Entity::Module(module) => &**module,
            Entity::Class(class) => &**class,
            Entity::Function(function) => &**function,
            Entity::Script(script) => &**script,
            Entity::Application(application) => &**application,
        }
    }

    /// Dotted name of the namespace plus the entity's own name.
    pub fn full_name(&self) -> String {
        match self {
            Entity::Module(module) => module.name.clone(),
            _ => join_name(self.module(), self.name()),
        }
    }

    pub fn as_class(&self) -> Option<&Arc<Class>> {
        match self {
            Entity::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Arc<Function>> {
        match self {
            Entity::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_module(&self) -> Option<&Arc<Module>> {
        match self {
            Entity::Module(module) => Some(module),
            _ => None,
        }
    }

    /// Returns true if `self` and `other` are the same cached object.
    pub fn ptr_eq(&self, other: &Entity) -> bool {
        match (self, other) {
            (Entity::Module(a), Entity::Module(b)) => Arc::ptr_eq(a, b),
            (Entity::Class(a), Entity::Class(b)) => Arc::ptr_eq(a, b),
            (Entity::Function(a), Entity::Function(b)) => Arc::ptr_eq(a, b),
            (Entity::Script(a), Entity::Script(b)) => Arc::ptr_eq(a, b),
            (Entity::Application(a), Entity::Application(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Documented for Entity {
    fn name(&self) -> &str {
        self.documented().name()
    }

    fn doc(&self) -> Option<&str> {
        self.documented().doc()
    }

    fn module(&self) -> &str {
        self.documented().module()
    }
}

/// Joins a namespace and a name with `.`, omitting the `.` for an empty
/// namespace.
pub fn join_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.into()
    } else {
        format!("{namespace}.{name}")
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{
        AttrValue, Attributes, Arguments, Class, Documented, Entity, Function, Member, Method,
        Module, Property, join_name, normalize_doc,
    };

    fn function(name: &str) -> Function {
        Function {
            name: name.into(),
            namespace: String::from("target.+pkg"),
            docstring: Some(String::from("Gets the value.")),
            args: ["obj"].into_iter().collect(),
            retv: Arguments::new(),
        }
    }

    #[test]
    fn accessor_names() {
        let method = Method::new(function("get.Value"), Attributes::new(), "Cls");
        assert_eq!(method.name(), "get_Value");
        assert_eq!(method.doc(), Some("Gets the value."));
        assert!(!method.is_static());
    }

    #[test]
    fn repeated_placeholders() {
        let args: Arguments = ["~", "x", "~"].into_iter().collect();
        assert_eq!(args.names().collect::<Vec<_>>(), ["~", "x", "~"]);
        assert!(args.get("x").is_some());
        assert!(args.get("y").is_none());
    }

    #[test]
    fn members_prefer_properties() {
        let mut class = Class::new("Cls", "target");
        class.properties.insert(
            String::from("Value"),
            Property {
                name: String::from("Value"),
                class: String::from("Cls"),
                namespace: String::from("target"),
                attrs: Attributes::from([(String::from("Dependent"), AttrValue::Bool(true))]),
                size: None,
                type_name: None,
                validators: None,
                default: None,
                docstring: None,
            },
        );
        class.methods.insert(
            String::from("Value"),
            Method::new(function("Value"), Attributes::new(), "Cls"),
        );
        assert!(matches!(class.member("Value"), Some(Member::Property(_))));
        assert!(class.member("Missing").is_none());
        assert_eq!(class.full_name(), "target.Cls");
    }

    #[test]
    fn module_metadata() {
        let module = Module::new("target.+pkg", PathBuf::from("/src/target/+pkg"), None);
        assert_eq!(module.full_name(), "target.+pkg");
        assert_eq!(module.package(), "target");
        assert_eq!(Entity::Module(module.into()).module(), "target");
        assert_eq!(join_name("", "f"), "f");
        assert_eq!(normalize_doc(Some(String::new())), None);
    }
}
