//! Text helpers for matching free-text transcript labels.

/// Lower-cases `text` and strips Vietnamese diacritics.
///
/// Handles both precomposed letters and letters followed by combining
/// marks (U+0300..=U+036F), so NFC and NFD input fold to the same string.
///
/// # Examples
///
/// ```
/// use gpa_engine::calculation::fold_diacritics;
///
/// assert_eq!(fold_diacritics("Học Vượt"), "hoc vuot");
/// assert_eq!(fold_diacritics("Đại số"), "dai so");
/// assert_eq!(fold_diacritics("Học kỳ phụ"), "hoc ky phu");
/// ```
pub fn fold_diacritics(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !is_combining_mark(*c))
        .map(base_letter)
        .collect()
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

fn base_letter(c: char) -> char {
    match c {
        'à' | 'á' | 'ạ' | 'ả' | 'ã' | 'â' | 'ầ' | 'ấ' | 'ậ' | 'ẩ' | 'ẫ' | 'ă' | 'ằ' | 'ắ'
        | 'ặ' | 'ẳ' | 'ẵ' => 'a',
        'è' | 'é' | 'ẹ' | 'ẻ' | 'ẽ' | 'ê' | 'ề' | 'ế' | 'ệ' | 'ể' | 'ễ' => 'e',
        'ì' | 'í' | 'ị' | 'ỉ' | 'ĩ' => 'i',
        'ò' | 'ó' | 'ọ' | 'ỏ' | 'õ' | 'ô' | 'ồ' | 'ố' | 'ộ' | 'ổ' | 'ỗ' | 'ơ' | 'ờ' | 'ớ'
        | 'ợ' | 'ở' | 'ỡ' => 'o',
        'ù' | 'ú' | 'ụ' | 'ủ' | 'ũ' | 'ư' | 'ừ' | 'ứ' | 'ự' | 'ử' | 'ữ' => 'u',
        'ỳ' | 'ý' | 'ỵ' | 'ỷ' | 'ỹ' => 'y',
        'đ' => 'd',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folds_precomposed_letters() {
        assert_eq!(fold_diacritics("Giáo dục thể chất"), "giao duc the chat");
        assert_eq!(fold_diacritics("Tiếng Anh đầu vào"), "tieng anh dau vao");
    }

    #[test]
    fn test_folds_uppercase_letters() {
        assert_eq!(fold_diacritics("HỌC VƯỢT"), "hoc vuot");
        assert_eq!(fold_diacritics("ĐỒ ÁN"), "do an");
    }

    #[test]
    fn test_strips_combining_marks() {
        // "học" written as o + combining dot below
        assert_eq!(fold_diacritics("ho\u{0323}c"), "hoc");
    }

    #[test]
    fn test_ascii_is_only_lowercased() {
        assert_eq!(fold_diacritics("HK1 (2023 - 2024)"), "hk1 (2023 - 2024)");
    }
}
