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

//! Structured documentation for MATLAB source trees.
//!
//! [lex] splits source text into tokens, [preprocess] normalizes the surface
//! syntax that would confuse a token walker, and [parse] turns one file into
//! an [Entity](model::Entity) of the [model].  A [Resolver](resolve::Resolver)
//! loads whole source trees on demand and finds entities by name.

pub mod app;
pub mod identifier;
pub mod lex;
pub mod message;
pub mod model;
pub mod parse;
pub mod preprocess;
pub mod resolve;
pub mod settings;
pub mod source;
