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

//! Conversions between dotted file system names, such as
//! `target.+pkg.@Cls`, and the names that MATLAB code uses, such as
//! `pkg.Cls`.

/// Names the class in a class folder by its folder: `x.@Cls.Cls` becomes
/// `x.@Cls`.  Other names are returned unchanged.
pub fn classfolder_class_name(dotted: &str) -> String {
    if let Some((folder, name)) = dotted.rsplit_once('.') {
        let folder_name = folder.rsplit('.').next().unwrap_or(folder);
        if folder_name.strip_prefix('@') == Some(name) {
            return folder.into();
        }
    }
    dotted.into()
}

/// Returns the name by which MATLAB code refers to the entity at file system
/// name `dotted`.  Plain folders do not contribute to the name, and a plain
/// folder inside a package starts the name over.  Package and class folders
/// contribute their names without `+` or `@`.  A class named after its class
/// folder appears once.
pub fn shortest_name(dotted: &str) -> String {
    let segments: Vec<&str> = dotted.split('.').collect();
    let mut parts: Vec<&str> = Vec::new();
    let mut class_folder = false;
    for (index, segment) in segments.iter().enumerate() {
        let is_last = index == segments.len() - 1;
        if let Some(package) = segment.strip_prefix('+') {
            parts.push(package);
            class_folder = false;
        } else if let Some(class) = segment.strip_prefix('@') {
            parts.push(class);
            class_folder = true;
        } else if is_last {
            if !(class_folder && parts.last() == Some(segment)) {
                parts.push(segment);
            }
        } else {
            parts.clear();
            class_folder = false;
        }
    }
    parts.join(".")
}

#[cfg(test)]
mod tests {
    use super::{classfolder_class_name, shortest_name};

    #[test]
    fn class_folders() {
        assert_eq!(classfolder_class_name("x.@Cls.Cls"), "x.@Cls");
        assert_eq!(classfolder_class_name("@Cls.Cls"), "@Cls");
        assert_eq!(classfolder_class_name("x.@Cls.method"), "x.@Cls.method");
        assert_eq!(classfolder_class_name("x.+Cls.Cls"), "x.+Cls.Cls");
        assert_eq!(classfolder_class_name("Cls"), "Cls");
    }

    #[test]
    fn shortest_names() {
        assert_eq!(shortest_name("target.+pkg.@Cls.Cls"), "pkg.Cls");
        assert_eq!(shortest_name("target.+pkg.@Cls"), "pkg.Cls");
        assert_eq!(shortest_name("target.+pkg.+sub.deep"), "pkg.sub.deep");
        assert_eq!(shortest_name("target.sub.func"), "func");
        assert_eq!(shortest_name("+a.plain.+b.f"), "b.f");
        assert_eq!(shortest_name("+pkg.+pkg"), "pkg.pkg");
        assert_eq!(shortest_name("target"), "target");
    }
}
