use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const MAX_STEM_CHARS: usize = 200;

pub fn sanitize_path_component(name: &str) -> String {
    let name: String = name.nfc().collect();
    let name = name.trim().replace(['\t', '\n', '\r'], " ");
    let name = WS_RE.replace_all(&name, " ");
    let name = name.replace(" | ", "｜");

    let name = name.trim_end_matches([' ', '-', '.', ';']);
    let name = name.trim_start_matches('.');

    let forbidden: &[(char, char)] = &[
        ('<', '＜'),
        ('>', '＞'),
        (':', '꞉'),
        ('"', '＂'),
        ('/', '⧸'),
        ('\\', '＼'),
        ('|', '｜'),
        ('?', '？'),
        ('*', ' '),
    ];

    let mut result = name.to_string();
    for (from, to) in forbidden {
        result = result.replace(*from, &to.to_string());
    }

    result.trim().to_string()
}

/// File name (without extension) for the audio of a video titled `title`.
pub fn audio_file_stem(title: &str) -> String {
    let clean = sanitize_path_component(title);
    let clean: String = clean.chars().take(MAX_STEM_CHARS).collect();
    let clean = clean.trim_end().to_string();
    if clean.is_empty() {
        "untitled".to_string()
    } else {
        clean
    }
}

/// yt-dlp reads `%(...)s` fields in `-o`; a literal percent must be doubled.
pub fn escape_output_template(stem: &str) -> String {
    stem.replace('%', "%%")
}
