//! Starter content for `/new`.

const PYTHON: &str = "def main():\n    pass\n\nif __name__ == \"__main__\":\n    main()";

const HTML: &str = "<!DOCTYPE html>\n\
<html lang=\"en\">\n\
<head>\n    \
<meta charset=\"UTF-8\">\n    \
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    \
<title>Document</title>\n\
</head>\n\
<body>\n    \n\
</body>\n\
</html>";

const JAVASCRIPT: &str = "// Your JavaScript code here";

/// Template languages, keyed by name.
pub const TEMPLATES: &[(&str, &str)] = &[
    ("python", PYTHON),
    ("html", HTML),
    ("javascript", JAVASCRIPT),
];

/// Maps an extension key to a template language name.
fn language_for(extension: &str) -> Option<&'static str> {
    match extension {
        "py" | "python" => Some("python"),
        "html" | "htm" => Some("html"),
        "js" | "mjs" | "javascript" => Some("javascript"),
        _ => None,
    }
}

/// Returns the template for `path`, or `""` when the extension is unknown.
///
/// The extension key is whatever follows the last `.` of the file name.
pub fn template_for(path: &str) -> &'static str {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);

    file_name
        .rsplit_once('.')
        .and_then(|(_, ext)| language_for(ext))
        .and_then(|lang| TEMPLATES.iter().find(|(name, _)| *name == lang))
        .map_or("", |(_, template)| template)
}
