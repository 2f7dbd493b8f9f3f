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

#![no_main]

use libfuzzer_sys::fuzz_target;
use matdoc::{lex::tokenize, parse::parse_str};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let tokens = tokenize(input);
        let text: String = tokens.iter().map(|token| token.text.as_str()).collect();
        assert_eq!(text, input);

        let _ = parse_str(input, "fuzz", "", |_| ());
    }
});
