pub(super) const COUNTRY_CODES: [&str; 26] = [
    "FR", "BE", "CH", "LU", "MC", "CA", "GB", "IE", "US", "ES", "PT", "IT", "DE", "NL", "AT", "PL",
    "RO", "BR", "AR", "MX", "CO", "MA", "DZ", "TN", "SN", "CI",
];

pub(super) const EXPERIENCE: [&str; 4] = [
    "NONE",
    "LESS_THAN_1_YEAR",
    "ONE_TO_3_YEARS",
    "MORE_THAN_3_YEARS",
];

pub(super) const ENGLISH_LEVEL: [&str; 5] = ["NONE", "BASIC", "INTERMEDIATE", "FLUENT", "NATIVE"];

pub(super) const TIME_PER_DAY: [&str; 4] = ["LESS_THAN_1H", "ONE_TO_3H", "THREE_TO_5H", "MORE_THAN_5H"];

pub(super) const CONTENT_KIND: [&str; 6] = [
    "PHOTOS",
    "VIDEOS",
    "LIVE_STREAMS",
    "STORIES",
    "TEXT_POSTS",
    "AUDIO",
];
