/// Chilean RUT handling: normalization and modulus-11 check digit
/// validation. Stored form is `BODY-DV` with no dots and an uppercase
/// verifier (e.g. `12345678-5`, `9876543-K`).

/// Strip dots and whitespace, uppercase the verifier, and insert the
/// dash if it was omitted. Returns None when the input has no usable
/// body/verifier split.
pub fn normalize(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect::<String>()
        .to_ascii_uppercase();

    let (body, dv) = match cleaned.split_once('-') {
        Some((b, d)) => (b.to_string(), d.to_string()),
        None => {
            if cleaned.len() < 2 {
                return None;
            }
            let (b, d) = cleaned.split_at(cleaned.len() - 1);
            (b.to_string(), d.to_string())
        }
    };

    if body.is_empty() || dv.len() != 1 {
        return None;
    }
    if !body.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let dv_char = dv.chars().next()?;
    if !dv_char.is_ascii_digit() && dv_char != 'K' {
        return None;
    }

    Some(format!("{}-{}", body, dv))
}

fn expected_verifier(body: &str) -> Option<char> {
    let mut sum: u32 = 0;
    let mut factor: u32 = 2;
    for c in body.chars().rev() {
        sum += c.to_digit(10)? * factor;
        factor = if factor == 7 { 2 } else { factor + 1 };
    }
    Some(match 11 - (sum % 11) {
        11 => '0',
        10 => 'K',
        n => char::from_digit(n, 10)?,
    })
}

/// Normalize and verify the check digit. Returns the normalized RUT on
/// success.
pub fn validate(raw: &str) -> Option<String> {
    let normalized = normalize(raw)?;
    let (body, dv) = normalized.split_once('-')?;
    let dv_char = dv.chars().next()?;
    if expected_verifier(body)? == dv_char {
        Some(normalized)
    } else {
        None
    }
}
