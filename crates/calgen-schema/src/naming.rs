//! Identifier derivation: snake_case names and band-agnostic struct names.

const UPPER_BAND: &str = "UpperBand";
const LOWER_BAND: &str = "LowerBand";
const PER_BAND: &str = "PerBand";

/// Convert a `CamelCaseName` to `camel_case_name`.
///
/// Every uppercase letter starts a new word, so acronyms are split letter by
/// letter (`CalTempADC` → `cal_temp_a_d_c`). Generated device code relies on
/// this exact spelling; it intentionally differs from `heck`'s word rules.
pub fn camel_to_snake(camel: &str) -> String {
    let mut snake = String::with_capacity(camel.len() + 8);
    let mut prev: Option<char> = None;
    for c in camel.chars() {
        if c.is_uppercase() {
            if !snake.is_empty() && prev != Some('_') {
                snake.push('_');
            }
            snake.extend(c.to_lowercase());
        } else {
            snake.push(c);
        }
        prev = Some(c);
    }
    snake
}

/// The band-independent identity of an entry name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandAgnosticName {
    /// Name with `UpperBand`/`LowerBand` replaced by `PerBand`.
    pub name: String,
    /// Whether this entry declares the shared struct.
    pub is_owner: bool,
}

/// Normalize a paired band entry name.
///
/// `UpperBandRfFilter` and `LowerBandRfFilter` both become `PerBandRfFilter`;
/// only the upper-band entry owns the shared declaration. Names without a band
/// token are returned unchanged and own their own declaration.
pub fn band_agnostic_name(name: &str) -> BandAgnosticName {
    let (pos, token, is_owner) = match name.find(UPPER_BAND) {
        Some(pos) => (pos, UPPER_BAND, true),
        None => match name.find(LOWER_BAND) {
            Some(pos) => (pos, LOWER_BAND, false),
            None => {
                return BandAgnosticName {
                    name: name.to_string(),
                    is_owner: true,
                }
            }
        },
    };

    let mut agnostic = String::with_capacity(name.len());
    agnostic.push_str(&name[..pos]);
    agnostic.push_str(PER_BAND);
    agnostic.push_str(&name[pos + token.len()..]);
    BandAgnosticName {
        name: agnostic,
        is_owner,
    }
}
