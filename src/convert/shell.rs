//! Fixed HTML page wrapped around converted markup.

const STYLE: &str = r#"    * { font-family: Arial, "Microsoft YaHei", "微软雅黑", sans-serif; }
    table { border-collapse: collapse; width: 100%; border: 1px solid #000; margin: 10px 0; }
    th, td { border: 1px solid #000; padding: 8px; }
    th { background-color: #f2f2f2; }
    mark { background-color: yellow; padding: 2px 4px; }
    body { font-family: Arial, "Microsoft YaHei", "微软雅黑", sans-serif; line-height: 1.6; margin: 20px; }"#;

/// Wraps a body fragment in a standalone UTF-8 HTML document.
#[must_use]
pub fn wrap_document(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"UTF-8\">\n  \
         <meta http-equiv=\"Content-Type\" content=\"text/html; charset=UTF-8\">\n  \
         <style>\n{STYLE}\n  </style>\n</head>\n<body>\n{body}\n</body>\n</html>"
    )
}
