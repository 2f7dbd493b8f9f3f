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

use crate::{
    message::{Diagnostic, Severity},
    model::{AttrKind, AttrValue, Dimension, Entity},
    preprocess::{preprocess, remove_comment_header},
};

use super::{parse_str, ErrorDetails, ParseError, Warning};

fn parse(text: &str, name: &str) -> (Result<Entity, ParseError>, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let result = parse_str(text, name, "", |diagnostic| diagnostics.push(diagnostic));
    (result, diagnostics)
}

fn warning_texts(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics
        .iter()
        .inspect(|diagnostic| assert_eq!(diagnostic.severity, Severity::Warning))
        .map(|diagnostic| diagnostic.text.clone())
        .collect()
}

#[test]
fn minimal_function() {
    let (result, diagnostics) = parse("function y = f(x)\n% doc\ny = x;\nend\n", "f");
    assert!(diagnostics.is_empty());
    let entity = result.unwrap();
    let function = entity.as_function().unwrap();
    assert_eq!(function.name, "f");
    assert_eq!(function.namespace, "");
    assert_eq!(function.docstring.as_deref(), Some("doc"));
    assert_eq!(function.args.names().collect::<Vec<_>>(), vec!["x"]);
    assert_eq!(function.retv.names().collect::<Vec<_>>(), vec!["y"]);
}

#[test]
fn function_docstrings() {
    let (result, _) = parse("function f(a, ~) % Trailing doc.\nend\n", "f");
    let entity = result.unwrap();
    let function = entity.as_function().unwrap();
    assert_eq!(function.docstring.as_deref(), Some("Trailing doc."));
    assert_eq!(function.args.names().collect::<Vec<_>>(), vec!["a", "~"]);
    assert!(function.retv.is_empty());

    // A comment block below the signature wins over a trailing comment.
    let (result, _) = parse("function f % Trailing.\n% Following.\nend\n", "f");
    let entity = result.unwrap();
    assert_eq!(
        entity.as_function().unwrap().docstring.as_deref(),
        Some("Following.")
    );

    // A blank line ends the docstring.
    let (result, _) = parse("function f()\n% One.\n\n% Two.\nend\n", "f");
    let entity = result.unwrap();
    assert_eq!(entity.as_function().unwrap().docstring.as_deref(), Some("One."));

    let (result, _) = parse("function f()\nx = 1;\nend\n", "f");
    assert_eq!(result.unwrap().as_function().unwrap().docstring, None);
}

#[test]
fn no_break_space_indentation() {
    let (result, _) = parse(
        "function f()\n% \u{a0}Non-breaking indent.\n%  Two spaces.\nend\n",
        "f",
    );
    let entity = result.unwrap();
    assert_eq!(
        entity.as_function().unwrap().docstring.as_deref(),
        Some("\u{a0}Non-breaking indent.\n Two spaces.")
    );

    let (result, _) = parse(
        concat!(
            "classdef C\n",
            "    properties\n",
            "        % \u{a0}Non-breaking indent.\n",
            "        %  Two spaces.\n",
            "        P\n",
            "    end\n",
            "end\n",
        ),
        "C",
    );
    let entity = result.unwrap();
    assert_eq!(
        entity.as_class().unwrap().properties["P"].docstring.as_deref(),
        Some("\u{a0}Non-breaking indent.\n Two spaces.")
    );
}

#[test]
fn one_line_function() {
    let (result, diagnostics) = parse("function y = sq(x), y = x.^2; end  % Squares x.\n", "sq");
    assert!(diagnostics.is_empty());
    let entity = result.unwrap();
    let function = entity.as_function().unwrap();
    assert_eq!(function.docstring.as_deref(), Some("Squares x."));
    assert_eq!(function.args.names().collect::<Vec<_>>(), vec!["x"]);
}

#[test]
fn function_without_end() {
    let (result, _) = parse(
        "function r = outer(x)\n% Outer.\nr = inner(x);\n\nfunction r = inner(x)\nr = x;\n",
        "outer",
    );
    let entity = result.unwrap();
    let function = entity.as_function().unwrap();
    assert_eq!(function.name, "outer");
    assert_eq!(function.docstring.as_deref(), Some("Outer."));
}

#[test]
fn function_name_mismatch() {
    let (result, diagnostics) = parse("% Header.\nfunction g()\nend\n", "f");
    assert_eq!(result.unwrap().as_function().unwrap().name, "g");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].to_string(),
        "2: warning: Declared name `g` does not match expected name `f`."
    );
}

#[test]
fn signature_errors() {
    let (result, _) = parse("function\nend\n", "f");
    assert_eq!(result.unwrap_err().details, ErrorDetails::MissingFunctionName);

    let (result, _) = parse("function f(x y)\nend\n", "f");
    assert_eq!(
        result.unwrap_err().details,
        ErrorDetails::MalformedSignature {
            expected: "`,` or `)`",
            found: String::from("`y`"),
        }
    );

    let (result, _) = parse("function f(x, 1)\nend\n", "f");
    assert_eq!(
        result.unwrap_err().details,
        ErrorDetails::MalformedSignature {
            expected: "a parameter name",
            found: String::from("`1`"),
        }
    );
}

#[test]
fn arguments_blocks() {
    let (result, diagnostics) = parse(include_str!("testdata/resize.m"), "resize");
    assert!(diagnostics.is_empty());
    let entity = result.unwrap();
    let function = entity.as_function().unwrap();
    assert_eq!(function.docstring.as_deref(), Some("Resize an image."));
    assert_eq!(
        function.args.names().collect::<Vec<_>>(),
        vec!["img", "scale", "opts", "opts.Method"]
    );

    let img = function.args.get("img").unwrap();
    assert_eq!(img.size, Some(vec![Dimension::Any, Dimension::Any]));
    assert_eq!(img.type_name.as_deref(), Some("double"));
    assert_eq!(img.validators, Some(vec![String::from("mustBeNumeric")]));
    assert_eq!(img.default, None);
    assert_eq!(img.docstring.as_deref(), Some("Image data."));

    let scale = function.args.get("scale").unwrap();
    assert_eq!(scale.size, Some(vec![Dimension::Fixed(1), Dimension::Fixed(1)]));
    assert_eq!(
        scale.validators,
        Some(vec![
            String::from("mustBePositive"),
            String::from("mustBeFinite")
        ])
    );
    assert_eq!(scale.default.as_deref(), Some("1"));
    assert_eq!(scale.docstring.as_deref(), Some("The scale factor."));

    let method = function.args.get("opts.Method").unwrap();
    assert_eq!(method.type_name.as_deref(), Some("string"));
    assert_eq!(method.default.as_deref(), Some("\"bilinear\""));
    assert_eq!(method.docstring, None);

    assert_eq!(function.retv.names().collect::<Vec<_>>(), vec!["out"]);
    let out = function.retv.get("out").unwrap();
    assert_eq!(out.type_name.as_deref(), Some("double"));
}

#[test]
fn class() {
    let (result, diagnostics) = parse(include_str!("testdata/Shape.m"), "Shape");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let entity = result.unwrap();
    let class = entity.as_class().unwrap();

    assert_eq!(class.name, "Shape");
    assert_eq!(class.location.lines, Some(4..=4));
    assert_eq!(class.attrs.get("Abstract"), Some(&AttrValue::Bool(true)));
    assert_eq!(class.superclass_names, vec!["handle", "geometry.Drawable"]);
    assert_eq!(
        class.docstring.as_deref(),
        Some("Base class for drawable shapes.\n\n  Subclasses implement area.")
    );

    assert_eq!(
        class.properties.keys().collect::<Vec<_>>(),
        vec!["Name", "Scale", "Points", "Sides"]
    );
    let name = &class.properties["Name"];
    assert_eq!(name.class, "Shape");
    assert_eq!(
        name.attrs.get("SetAccess"),
        Some(&AttrValue::Name(String::from("protected")))
    );
    assert_eq!(name.size, Some(vec![Dimension::Fixed(1), Dimension::Fixed(1)]));
    assert_eq!(name.type_name.as_deref(), Some("string"));
    assert_eq!(name.default.as_deref(), Some("\"shape\""));
    assert_eq!(name.docstring.as_deref(), Some("Display name."));

    let scale = &class.properties["Scale"];
    assert_eq!(scale.default.as_deref(), Some("1 + 2 +             3"));
    assert_eq!(scale.validators, Some(vec![String::from("mustBePositive")]));
    assert_eq!(scale.docstring.as_deref(), Some("Size multiplier."));

    let points = &class.properties["Points"];
    assert_eq!(
        points.default.as_deref(),
        Some("[0, 0\n                  1, 1]")
    );
    assert_eq!(points.docstring, None);

    let sides = &class.properties["Sides"];
    assert_eq!(sides.attrs.get("Constant"), Some(&AttrValue::Bool(true)));
    assert_eq!(sides.default.as_deref(), Some("0"));

    assert_eq!(
        class.methods.keys().collect::<Vec<_>>(),
        vec!["Shape", "get_Name", "area", "draw", "unit"]
    );
    let constructor = &class.methods["Shape"];
    assert_eq!(
        constructor.function.docstring.as_deref(),
        Some("Constructs a shape.")
    );
    assert_eq!(constructor.class, "Shape");
    assert_eq!(class.methods["get_Name"].function.docstring, None);
    assert_eq!(
        class.methods["area"].function.docstring.as_deref(),
        Some("Area of the shape.")
    );
    assert_eq!(
        class.methods["area"].attrs.get("Abstract"),
        Some(&AttrValue::Bool(true))
    );
    assert_eq!(
        class.methods["draw"].function.docstring.as_deref(),
        Some("Draws the shape.")
    );
    assert!(class.methods["unit"].is_static());
    assert!(!class.methods["draw"].is_static());
}

#[test]
fn preprocessing_is_idempotent() {
    let body = remove_comment_header(include_str!("testdata/Shape.m"));
    let once = preprocess(&body);
    assert_eq!(preprocess(&once), once);
}

#[test]
fn nested_ends() {
    // `end` inside an index does not close a block, so the properties after
    // the methods block are still found.
    let (result, diagnostics) = parse(
        r#"classdef Balance
    methods
        function obj = Balance(x)
            for k = 1:numel(x)
                if x(end) > 0
                    obj.v = x(k:end);
                end
            end
        end
    end
    properties
        After = 1
    end
end
"#,
        "Balance",
    );
    assert!(diagnostics.is_empty());
    let entity = result.unwrap();
    let class = entity.as_class().unwrap();
    assert_eq!(class.methods.keys().collect::<Vec<_>>(), vec!["Balance"]);
    assert_eq!(class.properties.keys().collect::<Vec<_>>(), vec!["After"]);
}

#[test]
fn skipped_blocks() {
    let (result, diagnostics) = parse(
        r#"classdef Color
    enumeration
        Red, Green
    end
    events (NotifyAccess = private)
        Changed
    end
    properties
        % Only property.
        Value
    end
end
"#,
        "Color",
    );
    assert!(diagnostics.is_empty());
    let entity = result.unwrap();
    let class = entity.as_class().unwrap();
    assert_eq!(class.properties.keys().collect::<Vec<_>>(), vec!["Value"]);
    assert_eq!(
        class.properties["Value"].docstring.as_deref(),
        Some("Only property.")
    );
    assert!(class.methods.is_empty());
}

#[test]
fn attribute_vocabularies() {
    let (result, _) = parse(
        "classdef C\n    properties (Static)\n        X\n    end\nend\n",
        "C",
    );
    let error = result.unwrap_err();
    assert_eq!(
        error.details,
        ErrorDetails::UnknownAttribute {
            vocabulary: "property",
            name: String::from("Static"),
        }
    );
    assert_eq!(error.to_string(), "2: Unknown property attribute `Static`.");

    let (result, diagnostics) = parse(
        "classdef C\n    methods (static, access = ?pkg.Friend)\n        function f()\n        end\n    end\nend\n",
        "C",
    );
    assert!(diagnostics.is_empty());
    let entity = result.unwrap();
    let method = &entity.as_class().unwrap().methods["f"];
    assert!(method.is_static());
    assert_eq!(
        method.attrs.get("Access"),
        Some(&AttrValue::Name(String::from("?pkg.Friend")))
    );

    let (result, diagnostics) = parse(
        "classdef C\n    properties (Constant = private, ~Hidden, Description = 'A ''quoted'' ' \"text\")\n        X\n    end\nend\n",
        "C",
    );
    let entity = result.unwrap();
    let property = &entity.as_class().unwrap().properties["X"];
    assert_eq!(property.attrs.get("Hidden"), Some(&AttrValue::Bool(false)));
    assert_eq!(
        property.attrs.get("Description"),
        Some(&AttrValue::String(String::from("A 'quoted' text")))
    );
    assert_eq!(
        warning_texts(&diagnostics),
        vec![
            Warning::AttributeKind {
                name: String::from("Constant"),
                expected: AttrKind::Bool,
                value: AttrValue::Name(String::from("private")),
            }
            .to_string()
        ]
    );

    let (result, _) = parse(
        "classdef C\n    methods (TestTags = {'Unit', 'Fast'})\n    end\nend\n",
        "C",
    );
    assert!(result.is_ok());

    let (result, _) = parse(
        "classdef (AllowedSubclasses = {?A, ?b.B}) C\nend\n",
        "C",
    );
    let entity = result.unwrap();
    assert_eq!(
        entity.as_class().unwrap().attrs.get("AllowedSubclasses"),
        Some(&AttrValue::List(vec![String::from("?A"), String::from("?b.B")]))
    );

    let (result, _) = parse("classdef (Sealed C\nend\n", "C");
    assert!(matches!(
        result.unwrap_err().details,
        ErrorDetails::MalformedAttributes { .. }
    ));
}

#[test]
fn class_warnings() {
    let (result, diagnostics) = parse("% Header.\nclassdef Other\nend\n", "Shape");
    assert_eq!(result.unwrap().as_class().unwrap().name, "Shape");
    assert_eq!(
        diagnostics
            .iter()
            .map(|diagnostic| diagnostic.to_string())
            .collect::<Vec<_>>(),
        vec!["2: warning: Declared name `Other` does not match expected name `Shape`."]
    );

    let (result, diagnostics) = parse("classdef C\n    x = 1;\nend\n", "C");
    assert!(result.is_ok());
    assert_eq!(
        warning_texts(&diagnostics),
        vec![Warning::UnexpectedToken(String::from("`x`")).to_string()]
    );

    let (result, diagnostics) = parse("classdef Open\n    properties\n        X\n", "Open");
    let entity = result.unwrap();
    assert_eq!(
        entity.as_class().unwrap().properties.keys().collect::<Vec<_>>(),
        vec!["X"]
    );
    assert_eq!(
        warning_texts(&diagnostics),
        vec![
            Warning::UnterminatedBlock("properties").to_string(),
            Warning::UnterminatedClass(String::from("Open")).to_string(),
        ]
    );

    let (result, diagnostics) = parse(
        "classdef C\n    properties\n        P (1,n) double\n    end\nend\n",
        "C",
    );
    let entity = result.unwrap();
    assert_eq!(entity.as_class().unwrap().properties["P"].size, None);
    assert_eq!(
        warning_texts(&diagnostics),
        vec![Warning::InvalidSize(String::from("P")).to_string()]
    );
}

#[test]
fn transpose_and_strings() {
    let (result, diagnostics) = parse(
        "classdef T\n    properties\n        V = [1 2 3]'  % Column.\n        S = 'it''s'\n        Q = {'a', 'b'}'\n    end\nend\n",
        "T",
    );
    assert!(diagnostics.is_empty());
    let entity = result.unwrap();
    let class = entity.as_class().unwrap();
    assert_eq!(class.properties["V"].default.as_deref(), Some("[1 2 3]'"));
    assert_eq!(class.properties["V"].docstring.as_deref(), Some("Column."));
    assert_eq!(class.properties["S"].default.as_deref(), Some("'it''s'"));
    assert_eq!(class.properties["Q"].default.as_deref(), Some("{'a', 'b'}'"));
}

#[test]
fn script() {
    let text = "% Plot the data.\n%   Uses the current axes.\n\nplot(x, y);\n";
    let (result, diagnostics) = parse(text, "plotdata");
    assert!(diagnostics.is_empty());
    let Entity::Script(script) = result.unwrap() else {
        panic!("expected a script");
    };
    assert_eq!(script.name, "plotdata");
    assert_eq!(
        script.docstring.as_deref(),
        Some("Plot the data.\n  Uses the current axes.")
    );
    assert_eq!(script.body, text);
}
