// src/mapping/locations.rs
//! Fixed dzongkhag and gewog option lists.
//!
//! These mirror the wizard's address dropdowns. NDI credential address
//! values are only accepted when they match an entry here (the wallet
//! free-texts addresses); the customer-record system is trusted and its
//! address text bypasses these lists entirely.

/// The twenty dzongkhags, in dropdown order.
pub const DZONGKHAGS: [&str; 20] = [
    "Bumthang",
    "Chhukha",
    "Dagana",
    "Gasa",
    "Haa",
    "Lhuentse",
    "Mongar",
    "Paro",
    "Pemagatshel",
    "Punakha",
    "Samdrup Jongkhar",
    "Samtse",
    "Sarpang",
    "Thimphu",
    "Trashigang",
    "Trashiyangtse",
    "Trongsa",
    "Tsirang",
    "Wangdue Phodrang",
    "Zhemgang",
];

/// Gewog dropdown options.
pub const GEWOGS: [&str; 56] = [
    "Chhoekhor",
    "Chhume",
    "Tang",
    "Ura",
    "Bongo",
    "Chapchha",
    "Darla",
    "Phuentsholing",
    "Drujeygang",
    "Goshi",
    "Khebisa",
    "Khamaed",
    "Khatoed",
    "Bji",
    "Katsho",
    "Uesu",
    "Gangzur",
    "Kurtoed",
    "Minjey",
    "Chaskhar",
    "Drepong",
    "Mongar",
    "Dopshari",
    "Doteng",
    "Lamgong",
    "Lungnyi",
    "Wangchang",
    "Chhimung",
    "Dungmaed",
    "Shumar",
    "Chhubu",
    "Goenshari",
    "Kabjisa",
    "Dewathang",
    "Orong",
    "Pemathang",
    "Dorokha",
    "Namgaychhoeling",
    "Samtse",
    "Gelephu",
    "Jigmechhoeling",
    "Chang",
    "Kawang",
    "Maedwang",
    "Bartsham",
    "Bidung",
    "Kanglung",
    "Bumdeling",
    "Jamkhar",
    "Drakteng",
    "Nubi",
    "Barshong",
    "Tsirang Toed",
    "Daga",
    "Nyishog",
    "Trong",
];

fn match_option(raw: &str, options: &[&'static str]) -> String {
    let trimmed = raw.trim();
    options
        .iter()
        .find(|opt| opt.eq_ignore_ascii_case(trimmed))
        .map(|opt| opt.to_string())
        .unwrap_or_default()
}

/// Matches free text against the dzongkhag list, case-insensitively.
/// Returns the canonical spelling, or `""` when unlisted.
pub fn match_dzongkhag(raw: &str) -> String {
    match_option(raw, &DZONGKHAGS)
}

/// Matches free text against the gewog list, case-insensitively.
/// Returns the canonical spelling, or `""` when unlisted.
pub fn match_gewog(raw: &str) -> String {
    match_option(raw, &GEWOGS)
}
