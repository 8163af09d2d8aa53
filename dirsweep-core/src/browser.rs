// Static, searchable HTML index of crawled files

use crate::manifest::group_sorted;
use dirsweep_scanner::ResultCollection;
use html_escape::{encode_double_quoted_attribute, encode_text};

const STYLE: &str = r#"body { font-family: Arial, sans-serif; background: #f9f9f9; padding: 20px; }
.container { max-width: 900px; margin: auto; background: #fff; padding: 20px; box-shadow: 0 0 15px rgba(0,0,0,0.1); border-radius: 8px; }
h1 { color: #333; }
input[type="search"] { width: 100%; padding: 10px; margin-bottom: 20px; border: 1px solid #ccc; border-radius: 5px; font-size: 16px; box-sizing: border-box; }
.folder { margin-bottom: 15px; border: 1px solid #ddd; border-radius: 5px; padding: 10px; background: #fafafa; }
.folder summary { font-weight: bold; font-size: 18px; cursor: pointer; outline: none; }
.folder ul { list-style: none; padding-left: 20px; margin-top: 10px; }
.folder li { margin: 5px 0; }
a { color: #0077cc; text-decoration: none; }
a:hover { text-decoration: underline; }
.no-results { color: #999; font-style: italic; padding: 10px; display: none; }"#;

const SCRIPT: &str = r#"function filterList() {
  const query = document.getElementById('searchInput').value.toLowerCase();
  const folders = document.querySelectorAll('#fileList details.folder');
  let totalVisible = 0;

  folders.forEach(folder => {
    const folderMatches = folder.querySelector('summary').textContent.toLowerCase().includes(query);
    let visible = 0;

    folder.querySelectorAll('li').forEach(item => {
      const show = folderMatches || item.textContent.toLowerCase().includes(query);
      item.style.display = show ? '' : 'none';
      if (show) visible++;
    });

    folder.style.display = visible > 0 ? '' : 'none';
    folder.open = visible > 0;
    totalVisible += visible;
  });

  document.getElementById('noResults').style.display = totalVisible === 0 ? 'block' : 'none';
}"#;

/// Render the file browser page.
///
/// One collapsible section per folder, folders sorted by name and files by
/// (name, url), with a client-side filter over folder and file names. The
/// output depends only on the records, never on their arrival order.
pub fn generate_html_browser(results: &ResultCollection) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\" />\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
    html.push_str(&format!("<title>File Index ({} files)</title>\n", results.len()));
    html.push_str("<style>\n");
    html.push_str(STYLE);
    html.push_str("\n</style>\n</head>\n<body>\n<div class=\"container\">\n");
    html.push_str(&format!("<h1>File Index ({} files)</h1>\n", results.len()));
    html.push_str(
        "<input type=\"search\" id=\"searchInput\" placeholder=\"Search files and folders...\" oninput=\"filterList()\">\n",
    );
    html.push_str("<div id=\"fileList\">\n");

    for (folder, records) in group_sorted(results) {
        html.push_str("<details class=\"folder\" open>\n<summary>");
        html.push_str(&encode_text(folder));
        html.push_str("</summary>\n<ul>\n");
        for record in records {
            html.push_str(&format!(
                "<li><a href=\"{}\" target=\"_blank\">{}</a></li>\n",
                encode_double_quoted_attribute(&record.url),
                encode_text(&record.name)
            ));
        }
        html.push_str("</ul>\n</details>\n");
    }

    html.push_str("<p class=\"no-results\" id=\"noResults\">No results found.</p>\n");
    html.push_str("</div>\n</div>\n<script>\n");
    html.push_str(SCRIPT);
    html.push_str("\n</script>\n</body>\n</html>\n");

    html
}
