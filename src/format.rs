//! Pure display formatting. Every function is total: absent input produces
//! empty output, never a panic.

/// Up to three initials from a display name. Terms are split on whitespace
/// or `.`; each contributes its first character uppercased, with a numeral
/// run right behind it kept so version-suffixed names keep their number
/// ("Uniswap V3" -> "UV3").
pub fn initials(name: &str) -> String {
    let mut out = String::new();
    for term in name
        .split(|c: char| c.is_whitespace() || c == '.')
        .take(3)
    {
        let mut chars = term.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.extend(chars.take_while(|c| c.is_ascii_digit()));
        }
    }
    out
}

/// Uppercase the first character, leave the rest alone.
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Grouped decimal string with a fixed fraction-digit count. With no
/// explicit count: 0 fraction digits for magnitudes >= 1000, otherwise 2.
/// Absent input yields an empty string so optional upstream fields render
/// as nothing.
pub fn format_number(n: Option<f64>, decimals: Option<usize>) -> String {
    let Some(n) = n else {
        return String::new();
    };
    let decimals = decimals.unwrap_or(if n.abs() >= 1000.0 { 0 } else { 2 });

    // Round half away from zero, like toLocaleString does. Rust's own
    // float formatting rounds half to even.
    let factor = 10f64.powi(decimals as i32);
    let rounded = (n * factor).round() / factor;

    group_thousands(&format!("{:.*}", decimals, rounded))
}

fn group_thousands(s: &str) -> String {
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    let offset = int_part.len() % 3;
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && i % 3 == offset % 3 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Styling bucket for a 1-day value change. Zero counts as negative: only
/// a strictly positive change earns the `+` sign and the green style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Positive,
    Negative,
}

pub fn change_direction(absolute_1d: f64) -> ChangeDirection {
    if absolute_1d > 0.0 {
        ChangeDirection::Positive
    } else {
        ChangeDirection::Negative
    }
}

/// Icon layout for a multi-token asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconStack<'a> {
    /// No underlying token images; show the app icon alone.
    AppOnly,
    /// One or two token icons plus a small app badge.
    Tokens(&'a [String]),
    /// First token icon, the app badge, and a "+N" overflow badge.
    Overflow { first: &'a String, more: usize },
}

pub fn icon_stack(images: &[String]) -> IconStack<'_> {
    match images.len() {
        0 => IconStack::AppOnly,
        1 | 2 => IconStack::Tokens(images),
        n => IconStack::Overflow {
            first: &images[0],
            more: n - 1,
        },
    }
}
