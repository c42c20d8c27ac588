/// Media types of the EPUB 3 core media types plus common extras, by extension.
const MEDIA_TYPES: &[(&str, &str)] = &[
    ("xhtml", "application/xhtml+xml"),
    ("html", "application/xhtml+xml"),
    ("htm", "application/xhtml+xml"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("ncx", "application/x-dtbncx+xml"),
    ("smil", "application/smil+xml"),
    ("pls", "application/pls+xml"),
    ("xml", "application/xml"),
    ("txt", "text/plain"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("webp", "image/webp"),
    ("ttf", "font/ttf"),
    ("otf", "font/otf"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/mp4"),
    ("aac", "audio/mp4"),
    ("ogg", "audio/ogg"),
    ("opus", "audio/opus"),
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("webm", "video/webm"),
];

const FALLBACK: &str = "application/octet-stream";

/// Media type of an archive entry, from its file extension
pub fn media_type_for(name: &str) -> &'static str {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return FALLBACK;
    };
    if ext.contains('/') {
        return FALLBACK;
    }
    MEDIA_TYPES
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(ext))
        .map_or(FALLBACK, |&(_, media_type)| media_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(media_type_for("text/ch1.xhtml"), "application/xhtml+xml");
        assert_eq!(media_type_for("images/Cover.JPG"), "image/jpeg");
        assert_eq!(media_type_for("fonts/serif.woff2"), "font/woff2");
    }

    #[test]
    fn test_unknown_or_missing_extension() {
        assert_eq!(media_type_for("LICENSE"), FALLBACK);
        assert_eq!(media_type_for("v1.0/README"), FALLBACK);
        assert_eq!(media_type_for("data.bin"), FALLBACK);
    }
}
