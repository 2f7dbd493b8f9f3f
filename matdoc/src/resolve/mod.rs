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

//! Finding entities by name in a source tree.
//!
//! A source tree is a root folder of modules.  Every folder below the root is
//! a [Module] named by its path relative to the root, with `.` between
//! segments and each folder's name kept as written, so that a package
//! `+pkg` inside the plain folder `target` is `target.+pkg`.  The root
//! itself is the module with the empty name.
//!
//! Lookups load files on demand.  Every result, including failures, is
//! cached under its name or path until [Resolver::reset], so that each file
//! is parsed at most once per build and repeated lookups return the same
//! [Arc].

use std::{
    collections::{HashMap, VecDeque},
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use indexmap::IndexMap;
use log::{debug, error, warn};

use crate::{
    app::{load_application, LoadError},
    identifier::{is_dotted_identifier, is_identifier},
    message::{Diagnostic, Location},
    model::{join_name, Class, Documented, Entity, Method, Module},
    parse::parse_source,
    settings::Settings,
    source::SourceFile,
};

mod names;

pub use names::{classfolder_class_name, shortest_name};

/// File whose leading comment documents the folder that contains it.
const CONTENTS: &str = "Contents.m";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum CacheKey {
    /// A module, by dotted name.
    Module(String),

    /// A source file or class folder, by path.
    File(PathBuf),

    /// A MATLAB name such as `pkg.Cls`.
    Name(String),
}

#[derive(Clone, Debug)]
enum Lookup {
    Found(Entity),

    /// The file exists but could not be loaded.  The reason is in the
    /// resolver's diagnostics.
    Failed,

    Missing,
}

impl Lookup {
    fn entity(self) -> Option<Entity> {
        match self {
            Lookup::Found(entity) => Some(entity),
            Lookup::Failed | Lookup::Missing => None,
        }
    }
}

/// Finds and caches the entities in one source tree.
///
/// A resolver may be shared among threads.  When several threads look up
/// the same name at once, one of them loads it and the others wait for the
/// result.
#[derive(Debug)]
pub struct Resolver {
    settings: Settings,
    cache: Mutex<HashMap<CacheKey, Arc<OnceLock<Lookup>>>>,
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl Resolver {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            cache: Mutex::new(HashMap::new()),
            diagnostics: Mutex::new(Vec::new()),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Errors and warnings found so far, in the order they were found.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn record(&self, diagnostic: Diagnostic) {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }

    /// Forgets every cached entity and diagnostic, so that the next lookups
    /// read the source tree afresh.
    pub fn reset(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Returns the cached result for `key`, calling `load` to produce it if
    /// there is none.  The cache lock is not held during `load`, which may
    /// itself look up other keys.
    fn lookup<F>(&self, key: CacheKey, load: F) -> Lookup
    where
        F: FnOnce() -> Lookup,
    {
        let slot = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_default()
            .clone();
        slot.get_or_init(load).clone()
    }

    fn module_path(&self, dotted: &str) -> PathBuf {
        let mut path = self.settings.root.clone();
        if !dotted.is_empty() {
            path.extend(dotted.split('.'));
        }
        path
    }

    /// Returns the module with dotted name `dotted`, e.g. `target.+pkg`, or
    /// the root module for the empty string.
    pub fn module(&self, dotted: &str) -> Option<Arc<Module>> {
        let lookup = self.lookup(CacheKey::Module(dotted.into()), || {
            let segments_ok = dotted.is_empty()
                || dotted
                    .split('.')
                    .all(|segment| !segment.is_empty() && !segment.starts_with('@'));
            let path = self.module_path(dotted);
            if !segments_ok || !path.is_dir() {
                return Lookup::Missing;
            }
            debug!("loading module `{dotted}` from {}", path.display());
            let contents = path.join(CONTENTS);
            let docstring = match contents.is_file() {
                true => self
                    .load_file(&contents, dotted)
                    .and_then(|entity| entity.doc().map(String::from)),
                false => None,
            };
            Lookup::Found(Entity::Module(Arc::new(Module::new(dotted, path, docstring))))
        });
        match lookup {
            Lookup::Found(Entity::Module(module)) => Some(module),
            _ => None,
        }
    }

    /// Returns the entity with file system name `name`, such as
    /// `target.+pkg.@Cls` or `target.+pkg.func`.  `x.@Cls.Cls` also names
    /// the class in class folder `x.@Cls`.
    pub fn entity(&self, name: &str) -> Option<Entity> {
        let name = classfolder_class_name(name);
        if let Some(module) = self.module(&name) {
            return Some(Entity::Module(module));
        }
        let (prefix, last) = name.rsplit_once('.').unwrap_or(("", name.as_str()));
        let last = last.strip_prefix('@').unwrap_or(last);
        self.module(prefix)?.get(self, last)
    }

    /// Resolves `name` as seen from the module named `within`: first
    /// relative to `within`, then as a file system name, and then as a
    /// MATLAB name like `pkg.Cls` found under any plain folder.
    pub fn resolve(&self, name: &str, within: Option<&str>) -> Option<Entity> {
        if let Some(within) = within.filter(|within| !within.is_empty()) {
            if let Some(entity) = self.entity(&join_name(within, name)) {
                return Some(entity);
            }
        }
        self.entity(name).or_else(|| self.matlab_name(name))
    }

    /// Finds MATLAB name `name` by searching the plain folders of the source
    /// tree breadth first, starting at the root.
    fn matlab_name(&self, name: &str) -> Option<Entity> {
        if !is_dotted_identifier(name) {
            return None;
        }
        let segments: Vec<&str> = name.split('.').collect();
        self.lookup(CacheKey::Name(name.into()), || {
            let mut queue = VecDeque::from([String::new()]);
            while let Some(folder) = queue.pop_front() {
                let Some(module) = self.module(&folder) else {
                    continue;
                };
                if let Some(entity) = self.find_in(&module, &segments) {
                    debug!("found `{name}` as `{}`", entity.full_name());
                    return Lookup::Found(entity);
                }
                for (key, member) in module.members(self) {
                    if let Entity::Module(sub) = member {
                        if !key.starts_with('+') && key != "private" {
                            queue.push_back(sub.name.clone());
                        }
                    }
                }
            }
            Lookup::Missing
        })
        .entity()
    }

    /// Finds `segments` inside `module`: every segment but the last names a
    /// package, and the last names a file, class folder, or package.
    fn find_in(&self, module: &Module, segments: &[&str]) -> Option<Entity> {
        let (last, packages) = segments.split_last()?;
        let mut module_name = module.name.clone();
        for package in packages {
            module_name = join_name(&module_name, &format!("+{package}"));
        }
        let module = self.module(&module_name)?;
        match module.get(self, last) {
            Some(Entity::Module(_)) | None => module
                .get(self, &format!("+{last}"))
                .filter(|entity| matches!(entity, Entity::Module(_))),
            found => found,
        }
    }

    /// Reads the members of `module` from its folder, sorted by file name.
    ///
    /// Files that fail to load are left out and recorded in
    /// [Resolver::diagnostics].
    pub fn load_members(&self, module: &Module) -> IndexMap<String, Entity> {
        let mut members = IndexMap::new();
        let entries = match sorted_entries(module.path()) {
            Ok(entries) => entries,
            Err(error) => {
                self.fail(module.path(), &LoadError::Io(error));
                return members;
            }
        };
        for path in entries {
            let Some(file_name) = path.file_name().and_then(OsStr::to_str) else {
                continue;
            };
            if file_name.starts_with('.') {
                continue;
            }
            let (key, entity) = if path.is_dir() {
                if let Some(class) = file_name.strip_prefix('@') {
                    (class, self.class_folder(&path, class, &module.name))
                } else {
                    let entity = self
                        .module(&join_name(&module.name, file_name))
                        .map(Entity::Module);
                    (file_name, entity)
                }
            } else if file_name == CONTENTS {
                continue;
            } else {
                let stem = match path.file_stem().and_then(OsStr::to_str) {
                    Some(stem) if is_identifier(stem) => stem,
                    _ => continue,
                };
                match path.extension().and_then(OsStr::to_str) {
                    Some("m" | "mlapp") => (stem, self.load_file(&path, &module.name)),
                    _ => continue,
                }
            };
            if let Some(entity) = entity {
                if members.contains_key(key) {
                    warn!("{}: `{key}` is declared more than once", module.path().display());
                } else {
                    members.insert(String::from(key), entity);
                }
            }
        }
        members
    }

    /// Loads the `.m` or `.mlapp` file at `path` as a member of module
    /// `namespace`.
    fn load_file(&self, path: &Path, namespace: &str) -> Option<Entity> {
        self.lookup(CacheKey::File(path.into()), || {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            if path.extension() == Some(OsStr::new("mlapp")) {
                return match load_application(path, &name, namespace) {
                    Ok(application) => Lookup::Found(Entity::Application(Arc::new(application))),
                    Err(error) => self.fail(path, &error),
                };
            }

            let source = match SourceFile::for_file(path, self.settings.encoding.encoding()) {
                Ok(source) => source,
                Err(error) => return self.fail(path, &LoadError::Io(error)),
            };
            let result = parse_source(&source, &name, namespace, |diagnostic| {
                warn!("{diagnostic}");
                self.record(diagnostic);
            });
            match result {
                Ok(entity) => Lookup::Found(entity),
                Err(parse_error) => {
                    let diagnostic =
                        Diagnostic::error(parse_error.location, parse_error.details.to_string());
                    error!("{diagnostic}");
                    self.record(diagnostic);
                    Lookup::Failed
                }
            }
        })
        .entity()
    }

    /// Loads the class in class folder `path`, merging in the methods that
    /// the folder's other files define.  A method declared in the class file
    /// keeps its attributes from there and takes everything else from its
    /// own file.
    fn class_folder(&self, path: &Path, class_name: &str, namespace: &str) -> Option<Entity> {
        self.lookup(CacheKey::File(path.into()), || {
            let class_file = path.join(format!("{class_name}.m"));
            let entity = match self.load_file(&class_file, namespace) {
                Some(Entity::Class(class)) => class,
                Some(other) => return Lookup::Found(other),
                None => return Lookup::Missing,
            };
            let mut class = Class::clone(&entity);

            let entries = match sorted_entries(path) {
                Ok(entries) => entries,
                Err(error) => return self.fail(path, &LoadError::Io(error)),
            };
            for method_file in entries {
                if method_file == class_file
                    || method_file.extension() != Some(OsStr::new("m"))
                    || !method_file.is_file()
                {
                    continue;
                }
                let function = match self.load_file(&method_file, namespace) {
                    Some(Entity::Function(function)) => function,
                    Some(other) => {
                        warn!(
                            "{}: expected a method of `{}` but found a {}",
                            method_file.display(),
                            class.name,
                            other.kind()
                        );
                        continue;
                    }
                    None => continue,
                };
                let mut function = Arc::unwrap_or_clone(function);
                let attrs = match class.methods.get(&function.name) {
                    Some(declared) => {
                        if function.docstring.is_none() {
                            function.docstring = declared.function.docstring.clone();
                        }
                        declared.attrs.clone()
                    }
                    None => Default::default(),
                };
                let method = Method::new(function, attrs, class.name.as_str());
                class
                    .methods
                    .insert(method.function.name.clone(), method);
            }
            Lookup::Found(Entity::Class(Arc::new(class)))
        })
        .entity()
    }

    fn fail(&self, path: &Path, error: &LoadError) -> Lookup {
        let diagnostic = Diagnostic::error(
            Location::for_file(path.display().to_string()),
            error.to_string(),
        );
        error!("{diagnostic}");
        self.record(diagnostic);
        Lookup::Failed
    }
}

/// The paths in folder `path`, sorted by file name.
fn sorted_entries(path: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(path)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();
    Ok(entries)
}
