// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! Bundled 5x7 bitmap font
//!
//! Always available fallback when no system font can be loaded. Glyph
//! bitmaps are traced into closed outlines with the same boundary walker
//! used for uploaded images, so diagonal strokes stay connected.

use super::{GlyphOutline, OutlineProvider};
use crate::trace::{connect_diagonals, trace_bitmap};

/// Width of one bitmap cell in em units. Seven rows make the cap height
/// 0.7 em, in line with common latin typefaces.
const CELL_EM: f64 = 0.1;
/// Pen advance per glyph: five columns plus one cell of spacing.
const ADVANCE_EM: f64 = 0.6;

pub struct BuiltinFont;

impl OutlineProvider for BuiltinFont {
    fn name(&self) -> &'static str {
        "builtin-5x7"
    }

    fn glyph(&self, c: char) -> Option<GlyphOutline> {
        let rows = glyph_rows(c.to_ascii_uppercase())?;
        let grid: Vec<Vec<bool>> = rows
            .iter()
            .map(|r| r.chars().map(|ch| ch == '#').collect())
            .collect();
        let bridged = connect_diagonals(&grid);
        let mut contours = trace_bitmap(&bridged);
        for contour in &mut contours {
            for p in &mut contour.points {
                // Halve out of the bridged grid, then map row 7 (bitmap
                // bottom) onto the baseline with Y up.
                let px = p.x * 0.5;
                let py = p.y * 0.5;
                p.x = px * CELL_EM;
                p.y = (7.0 - py) * CELL_EM;
            }
        }
        Some(GlyphOutline {
            contours,
            advance: ADVANCE_EM,
        })
    }
}

/// 5x7 bitmap per glyph, top row first. Lowercase input is uppercased by
/// the caller.
fn glyph_rows(c: char) -> Option<[&'static str; 7]> {
    let rows = match c {
        'A' => [".###.", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"],
        'B' => ["####.", "#...#", "#...#", "####.", "#...#", "#...#", "####."],
        'C' => [".###.", "#...#", "#....", "#....", "#....", "#...#", ".###."],
        'D' => ["####.", "#...#", "#...#", "#...#", "#...#", "#...#", "####."],
        'E' => ["#####", "#....", "#....", "####.", "#....", "#....", "#####"],
        'F' => ["#####", "#....", "#....", "####.", "#....", "#....", "#...."],
        'G' => [".###.", "#...#", "#....", "#.###", "#...#", "#...#", ".###."],
        'H' => ["#...#", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"],
        'I' => ["#####", "..#..", "..#..", "..#..", "..#..", "..#..", "#####"],
        'J' => ["..###", "...#.", "...#.", "...#.", "...#.", "#..#.", ".##.."],
        'K' => ["#...#", "#..#.", "#.#..", "##...", "#.#..", "#..#.", "#...#"],
        'L' => ["#....", "#....", "#....", "#....", "#....", "#....", "#####"],
        'M' => ["#...#", "##.##", "#.#.#", "#.#.#", "#...#", "#...#", "#...#"],
        'N' => ["#...#", "##..#", "#.#.#", "#..##", "#...#", "#...#", "#...#"],
        'O' => [".###.", "#...#", "#...#", "#...#", "#...#", "#...#", ".###."],
        'P' => ["####.", "#...#", "#...#", "####.", "#....", "#....", "#...."],
        'Q' => [".###.", "#...#", "#...#", "#...#", "#.#.#", "#..#.", ".##.#"],
        'R' => ["####.", "#...#", "#...#", "####.", "#.#..", "#..#.", "#...#"],
        'S' => [".####", "#....", "#....", ".###.", "....#", "....#", "####."],
        'T' => ["#####", "..#..", "..#..", "..#..", "..#..", "..#..", "..#.."],
        'U' => ["#...#", "#...#", "#...#", "#...#", "#...#", "#...#", ".###."],
        'V' => ["#...#", "#...#", "#...#", "#...#", "#...#", ".#.#.", "..#.."],
        'W' => ["#...#", "#...#", "#...#", "#.#.#", "#.#.#", "##.##", "#...#"],
        'X' => ["#...#", "#...#", ".#.#.", "..#..", ".#.#.", "#...#", "#...#"],
        'Y' => ["#...#", "#...#", ".#.#.", "..#..", "..#..", "..#..", "..#.."],
        'Z' => ["#####", "....#", "...#.", "..#..", ".#...", "#....", "#####"],
        '0' => [".###.", "#...#", "#..##", "#.#.#", "##..#", "#...#", ".###."],
        '1' => ["..#..", ".##..", "..#..", "..#..", "..#..", "..#..", ".###."],
        '2' => [".###.", "#...#", "....#", "...#.", "..#..", ".#...", "#####"],
        '3' => [".###.", "#...#", "....#", "..##.", "....#", "#...#", ".###."],
        '4' => ["...#.", "..##.", ".#.#.", "#..#.", "#####", "...#.", "...#."],
        '5' => ["#####", "#....", "####.", "....#", "....#", "#...#", ".###."],
        '6' => [".###.", "#....", "#....", "####.", "#...#", "#...#", ".###."],
        '7' => ["#####", "....#", "...#.", "..#..", ".#...", ".#...", ".#..."],
        '8' => [".###.", "#...#", "#...#", ".###.", "#...#", "#...#", ".###."],
        '9' => [".###.", "#...#", "#...#", ".####", "....#", "....#", ".###."],
        '-' => [".....", ".....", ".....", "#####", ".....", ".....", "....."],
        '.' => [".....", ".....", ".....", ".....", ".....", ".##..", ".##.."],
        '!' => ["..#..", "..#..", "..#..", "..#..", "..#..", ".....", "..#.."],
        '?' => [".###.", "#...#", "....#", "...#.", "..#..", ".....", "..#.."],
        _ => return None,
    };
    Some(rows)
}
