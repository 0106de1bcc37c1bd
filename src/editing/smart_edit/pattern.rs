//! Point classification tokens and pattern template expansion
//!
//! A template such as `"[X@][CS]H"` describes a family of concrete token
//! strings. Bracketed sets list alternatives, `X` stands for any point
//! class (but not a selected neighbour).

use crate::core::state::{Point, PointId};
use std::collections::HashSet;

/// Class of one slot in a point window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    /// Outside the contour
    NoPoint,
    Corner,
    Handle,
    Smooth,
    /// A selected neighbour, whatever its type
    Selected,
}

impl Token {
    pub fn as_char(self) -> char {
        match self {
            Token::NoPoint => 'N',
            Token::Corner => 'C',
            Token::Handle => 'H',
            Token::Smooth => 'S',
            Token::Selected => '@',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'N' => Some(Token::NoPoint),
            'C' => Some(Token::Corner),
            'H' => Some(Token::Handle),
            'S' => Some(Token::Smooth),
            '@' => Some(Token::Selected),
            _ => None,
        }
    }

    /// Classify a window slot. The center point is never reported as
    /// selected, it is the point being moved.
    pub fn classify(point: Option<&Point>, selected: &HashSet<PointId>, is_center: bool) -> Self {
        match point {
            None => Token::NoPoint,
            Some(p) if !is_center && selected.contains(&p.id) => Token::Selected,
            Some(p) if !p.is_on_curve() => Token::Handle,
            Some(p) if p.is_smooth() => Token::Smooth,
            Some(_) => Token::Corner,
        }
    }
}

/// What `X` expands to
const ANY_POINT: [Token; 4] = [Token::NoPoint, Token::Corner, Token::Smooth, Token::Handle];

/// Expand a template into every concrete pattern it matches
///
/// Returns an empty list for malformed templates (unknown characters,
/// unterminated or empty sets).
pub fn expand(template: &str) -> Vec<String> {
    let mut slots: Vec<Vec<Token>> = Vec::new();
    let mut chars = template.chars();

    while let Some(c) = chars.next() {
        match c {
            '[' => {
                let mut set = Vec::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    match c {
                        ']' => {
                            closed = true;
                            break;
                        }
                        'X' => set.extend(ANY_POINT),
                        other => match Token::from_char(other) {
                            Some(token) => set.push(token),
                            None => return Vec::new(),
                        },
                    }
                }
                if !closed || set.is_empty() {
                    return Vec::new();
                }
                slots.push(set);
            }
            'X' => slots.push(ANY_POINT.to_vec()),
            other => match Token::from_char(other) {
                Some(token) => slots.push(vec![token]),
                None => return Vec::new(),
            },
        }
    }

    if slots.is_empty() {
        return Vec::new();
    }

    slots.iter().fold(vec![String::new()], |prefixes, slot| {
        prefixes
            .iter()
            .flat_map(|prefix| {
                slot.iter().map(move |token| {
                    let mut s = prefix.clone();
                    s.push(token.as_char());
                    s
                })
            })
            .collect()
    })
}
