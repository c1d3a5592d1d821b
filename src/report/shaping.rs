//! Arabic text shaping for PDF output.
//!
//! PDF text operators draw glyphs in the order given, with no OpenType
//! shaping. Arabic strings therefore have to be converted to contextual
//! presentation forms and then put into visual order before they are
//! measured or drawn.

use unicode_bidi::BidiInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Joining {
    /// Joins on the right side only (the preceding letter).
    Right,
    /// Joins on both sides.
    Dual,
    /// Tatweel: joins both sides and has no contextual forms.
    Causing,
    /// Never joins.
    None,
}

/// `(letter, joining, [isolated, final, initial, medial])`.
/// Right-joining letters repeat the isolated/final forms for initial/medial.
const LETTERS: &[(char, Joining, [char; 4])] = &[
    ('\u{0621}', Joining::None, ['\u{FE80}', '\u{FE80}', '\u{FE80}', '\u{FE80}']),
    ('\u{0622}', Joining::Right, ['\u{FE81}', '\u{FE82}', '\u{FE81}', '\u{FE82}']),
    ('\u{0623}', Joining::Right, ['\u{FE83}', '\u{FE84}', '\u{FE83}', '\u{FE84}']),
    ('\u{0624}', Joining::Right, ['\u{FE85}', '\u{FE86}', '\u{FE85}', '\u{FE86}']),
    ('\u{0625}', Joining::Right, ['\u{FE87}', '\u{FE88}', '\u{FE87}', '\u{FE88}']),
    ('\u{0626}', Joining::Dual, ['\u{FE89}', '\u{FE8A}', '\u{FE8B}', '\u{FE8C}']),
    ('\u{0627}', Joining::Right, ['\u{FE8D}', '\u{FE8E}', '\u{FE8D}', '\u{FE8E}']),
    ('\u{0628}', Joining::Dual, ['\u{FE8F}', '\u{FE90}', '\u{FE91}', '\u{FE92}']),
    ('\u{0629}', Joining::Right, ['\u{FE93}', '\u{FE94}', '\u{FE93}', '\u{FE94}']),
    ('\u{062A}', Joining::Dual, ['\u{FE95}', '\u{FE96}', '\u{FE97}', '\u{FE98}']),
    ('\u{062B}', Joining::Dual, ['\u{FE99}', '\u{FE9A}', '\u{FE9B}', '\u{FE9C}']),
    ('\u{062C}', Joining::Dual, ['\u{FE9D}', '\u{FE9E}', '\u{FE9F}', '\u{FEA0}']),
    ('\u{062D}', Joining::Dual, ['\u{FEA1}', '\u{FEA2}', '\u{FEA3}', '\u{FEA4}']),
    ('\u{062E}', Joining::Dual, ['\u{FEA5}', '\u{FEA6}', '\u{FEA7}', '\u{FEA8}']),
    ('\u{062F}', Joining::Right, ['\u{FEA9}', '\u{FEAA}', '\u{FEA9}', '\u{FEAA}']),
    ('\u{0630}', Joining::Right, ['\u{FEAB}', '\u{FEAC}', '\u{FEAB}', '\u{FEAC}']),
    ('\u{0631}', Joining::Right, ['\u{FEAD}', '\u{FEAE}', '\u{FEAD}', '\u{FEAE}']),
    ('\u{0632}', Joining::Right, ['\u{FEAF}', '\u{FEB0}', '\u{FEAF}', '\u{FEB0}']),
    ('\u{0633}', Joining::Dual, ['\u{FEB1}', '\u{FEB2}', '\u{FEB3}', '\u{FEB4}']),
    ('\u{0634}', Joining::Dual, ['\u{FEB5}', '\u{FEB6}', '\u{FEB7}', '\u{FEB8}']),
    ('\u{0635}', Joining::Dual, ['\u{FEB9}', '\u{FEBA}', '\u{FEBB}', '\u{FEBC}']),
    ('\u{0636}', Joining::Dual, ['\u{FEBD}', '\u{FEBE}', '\u{FEBF}', '\u{FEC0}']),
    ('\u{0637}', Joining::Dual, ['\u{FEC1}', '\u{FEC2}', '\u{FEC3}', '\u{FEC4}']),
    ('\u{0638}', Joining::Dual, ['\u{FEC5}', '\u{FEC6}', '\u{FEC7}', '\u{FEC8}']),
    ('\u{0639}', Joining::Dual, ['\u{FEC9}', '\u{FECA}', '\u{FECB}', '\u{FECC}']),
    ('\u{063A}', Joining::Dual, ['\u{FECD}', '\u{FECE}', '\u{FECF}', '\u{FED0}']),
    ('\u{0640}', Joining::Causing, ['\u{0640}', '\u{0640}', '\u{0640}', '\u{0640}']),
    ('\u{0641}', Joining::Dual, ['\u{FED1}', '\u{FED2}', '\u{FED3}', '\u{FED4}']),
    ('\u{0642}', Joining::Dual, ['\u{FED5}', '\u{FED6}', '\u{FED7}', '\u{FED8}']),
    ('\u{0643}', Joining::Dual, ['\u{FED9}', '\u{FEDA}', '\u{FEDB}', '\u{FEDC}']),
    ('\u{0644}', Joining::Dual, ['\u{FEDD}', '\u{FEDE}', '\u{FEDF}', '\u{FEE0}']),
    ('\u{0645}', Joining::Dual, ['\u{FEE1}', '\u{FEE2}', '\u{FEE3}', '\u{FEE4}']),
    ('\u{0646}', Joining::Dual, ['\u{FEE5}', '\u{FEE6}', '\u{FEE7}', '\u{FEE8}']),
    ('\u{0647}', Joining::Dual, ['\u{FEE9}', '\u{FEEA}', '\u{FEEB}', '\u{FEEC}']),
    ('\u{0648}', Joining::Right, ['\u{FEED}', '\u{FEEE}', '\u{FEED}', '\u{FEEE}']),
    ('\u{0649}', Joining::Right, ['\u{FEEF}', '\u{FEF0}', '\u{FEEF}', '\u{FEF0}']),
    ('\u{064A}', Joining::Dual, ['\u{FEF1}', '\u{FEF2}', '\u{FEF3}', '\u{FEF4}']),
    ('\u{067E}', Joining::Dual, ['\u{FB56}', '\u{FB57}', '\u{FB58}', '\u{FB59}']),
    ('\u{0686}', Joining::Dual, ['\u{FB7A}', '\u{FB7B}', '\u{FB7C}', '\u{FB7D}']),
    ('\u{0698}', Joining::Right, ['\u{FB8A}', '\u{FB8B}', '\u{FB8A}', '\u{FB8B}']),
    ('\u{06A9}', Joining::Dual, ['\u{FB8E}', '\u{FB8F}', '\u{FB90}', '\u{FB91}']),
    ('\u{06AF}', Joining::Dual, ['\u{FB92}', '\u{FB93}', '\u{FB94}', '\u{FB95}']),
    ('\u{06CC}', Joining::Dual, ['\u{FBFC}', '\u{FBFD}', '\u{FBFE}', '\u{FBFF}']),
];

const LAM: char = '\u{0644}';

/// Lam followed by an alef variant becomes one ligature: `(alef, [isolated, final])`.
const LAM_ALEF: &[(char, [char; 2])] = &[
    ('\u{0622}', ['\u{FEF5}', '\u{FEF6}']),
    ('\u{0623}', ['\u{FEF7}', '\u{FEF8}']),
    ('\u{0625}', ['\u{FEF9}', '\u{FEFA}']),
    ('\u{0627}', ['\u{FEFB}', '\u{FEFC}']),
];

const MIRRORED: &[(char, char)] = &[
    ('(', ')'),
    (')', '('),
    ('[', ']'),
    (']', '['),
    ('{', '}'),
    ('}', '{'),
    ('<', '>'),
    ('>', '<'),
    ('«', '»'),
    ('»', '«'),
];

fn letter(c: char) -> Option<(Joining, [char; 4])> {
    LETTERS
        .iter()
        .find(|(base, _, _)| *base == c)
        .map(|(_, joining, forms)| (*joining, *forms))
}

fn joining(c: char) -> Joining {
    letter(c).map(|(j, _)| j).unwrap_or(Joining::None)
}

/// Combining marks that do not affect joining; dropped from the output.
fn is_harakah(c: char) -> bool {
    matches!(c,
        '\u{0610}'..='\u{061A}'
        | '\u{064B}'..='\u{065F}'
        | '\u{0670}'
        | '\u{06D6}'..='\u{06DC}'
        | '\u{06DF}'..='\u{06E8}'
        | '\u{06EA}'..='\u{06ED}')
}

fn joins_forward(j: Joining) -> bool {
    matches!(j, Joining::Dual | Joining::Causing)
}

fn joins_backward(j: Joining) -> bool {
    matches!(j, Joining::Right | Joining::Dual | Joining::Causing)
}

/// True when `text` contains any Arabic-script character.
pub fn contains_arabic(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{0600}'..='\u{06FF}'
            | '\u{0750}'..='\u{077F}'
            | '\u{FB50}'..='\u{FDFF}'
            | '\u{FE70}'..='\u{FEFF}')
    })
}

/// Replace Arabic letters with their contextual presentation forms.
/// Output stays in logical order.
pub fn reshape(text: &str) -> String {
    let chars: Vec<char> = text.chars().filter(|c| !is_harakah(*c)).collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let Some((join, forms)) = letter(c) else {
            out.push(c);
            i += 1;
            continue;
        };

        let prev = i.checked_sub(1).map(|p| joining(chars[p]));
        let next = chars.get(i + 1).copied();
        let joins_prev = joins_backward(join) && prev.map(joins_forward).unwrap_or(false);

        if c == LAM {
            if let Some(ligature) = next.and_then(|n| LAM_ALEF.iter().find(|(alef, _)| *alef == n)) {
                out.push(if joins_prev { ligature.1[1] } else { ligature.1[0] });
                i += 2;
                continue;
            }
        }

        let joins_next = joins_forward(join) && next.map(|n| joins_backward(joining(n))).unwrap_or(false);
        let form = match (joins_prev, joins_next) {
            (false, false) => forms[0],
            (true, false) => forms[1],
            (false, true) => forms[2],
            (true, true) => forms[3],
        };
        out.push(form);
        i += 1;
    }

    out
}

/// Reorder a logical-order string into visual (left-to-right drawing) order.
pub fn visual_order(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let bidi = BidiInfo::new(text, None);
    let mut out = String::with_capacity(text.len());

    for para in &bidi.paragraphs {
        let line = para.range.clone();
        let (levels, runs) = bidi.visual_runs(para, line);
        for run in runs {
            let segment = &text[run.clone()];
            if levels[run.start].is_rtl() {
                out.extend(segment.chars().rev().map(mirror));
            } else {
                out.push_str(segment);
            }
        }
    }

    out
}

fn mirror(c: char) -> char {
    MIRRORED
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
        .unwrap_or(c)
}

/// Reshape and reorder an Arabic string for drawing. Strings without Arabic
/// characters are returned unchanged.
pub fn shape_arabic(text: &str) -> String {
    if !contains_arabic(text) {
        return text.to_string();
    }
    visual_order(&reshape(text))
}
