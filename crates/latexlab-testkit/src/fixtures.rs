//! Template fixtures and fake LaTeX engines

use std::path::{Path, PathBuf};

/// One-field template used across unit tests
pub const SIMPLE_TEMPLATE: &str = "\\documentclass{<< document_class >>}\n\
<% for p in packages %>\n\
\\usepackage{<< p >>}\n\
<% endfor %>\n\
\\title{<< title >>}\n";

pub const SIMPLE_CONFIG: &str = r#"name: simple
description: Single title field
document_type: article
fields:
  - name: title
    type: string
    label: Title
packages: [amsmath, graphicx]
"#;

/// Template exercising numeric bounds, choices and optional fields
pub const REPORT_TEMPLATE: &str = r#"\documentclass[<< font_size >>]{<< document_class >>}
\title{<< title >>}
<# pages is bounded to 1..50 #>
% pages: << pages >>
<% if abstract %>
\begin{abstract}
<< abstract >>
\end{abstract}
<% endif %>
\begin{document}
\maketitle
\end{document}
"#;

pub const REPORT_CONFIG: &str = r#"name: report
description: Lab report with page budget
document_type: report
author: Physics Dept
fields:
  - name: title
    type: string
    label: Report title
  - name: pages
    type: integer
    label: Page budget
    required: false
    default: 10
    min_value: 1
    max_value: 50
  - name: font_size
    type: choice
    label: Font size
    choices: ["10pt", "11pt", "12pt"]
    default: "11pt"
  - name: abstract
    type: multiline
    label: Abstract
    required: false
tags: [lab, physics]
"#;

/// Write `<name>.tex.j2` and `<name>.yaml` into `dir`
pub fn write_template(dir: &Path, name: &str, source: &str, config: &str) -> PathBuf {
    std::fs::create_dir_all(dir).expect("Failed to create template dir");
    let template_path = dir.join(format!("{}.tex.j2", name));
    std::fs::write(&template_path, source).expect("Failed to write template");
    std::fs::write(dir.join(format!("{}.yaml", name)), config).expect("Failed to write config");
    template_path
}

/// Write the simple and report fixtures into `dir`
pub fn write_fixture_templates(dir: &Path) {
    write_template(dir, "simple", SIMPLE_TEMPLATE, SIMPLE_CONFIG);
    write_template(dir, "report", REPORT_TEMPLATE, REPORT_CONFIG);
}

/// Install a shell script named `name` in `bin_dir` that mimics a LaTeX engine
///
/// The script prints its arguments, then either creates `<stem>.pdf` next to
/// the `.tex` argument (in its working directory) and exits 0, or prints a
/// LaTeX-style error and exits with `exit_code`. Only shell builtins are used,
/// so `PATH` can be restricted to `bin_dir`.
#[cfg(unix)]
pub fn fake_engine(bin_dir: &Path, name: &str, exit_code: i32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    std::fs::create_dir_all(bin_dir).expect("Failed to create bin dir");
    let script = format!(
        r#"#!/bin/sh
echo "{name} $*"
for arg in "$@"; do last="$arg"; done
if [ {code} -ne 0 ]; then
  echo "! LaTeX Error: fake failure in $last"
  exit {code}
fi
: > "${{last%.tex}}.pdf"
exit 0
"#,
        name = name,
        code = exit_code
    );

    let path = bin_dir.join(name);
    std::fs::write(&path, script).expect("Failed to write fake engine");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to chmod fake engine");
    path
}
