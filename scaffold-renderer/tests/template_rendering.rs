use std::fs;
use std::path::{Path, PathBuf};

use scaffold_renderer::{discover_templates, render_tree, RenderContext, RenderError, TemplateSpec};
use tempfile::TempDir;

const SPEC_YAML: &str = "\
name: rust-lib
description: Minimal library crate
variables:
  - name: project_name
    default: my-project
    prompt: Project name
  - name: author
    default: Jane Doe
  - name: license
    default: MIT
copy_without_render:
  - \".github/**\"
";

fn make_template(root: &Path) -> PathBuf {
    let dir = root.join("rust-lib");
    let project = dir.join("project");
    fs::create_dir_all(project.join("src")).expect("mkdir src");
    fs::create_dir_all(project.join(".github/workflows")).expect("mkdir workflows");
    fs::create_dir_all(project.join("{% if license != 'none' %}legal{% endif %}"))
        .expect("mkdir legal");

    fs::write(dir.join("template.yaml"), SPEC_YAML).expect("spec");
    fs::write(
        project.join("Cargo.toml"),
        "[package]\nname = \"{{ project_name }}\"\nauthors = [\"{{ author }}\"]\n",
    )
    .expect("cargo");
    fs::write(
        project.join("src/lib.rs"),
        "//! {{ project_name }} ({{ scaffold.template }})\n",
    )
    .expect("lib");
    fs::write(
        project.join(".github/workflows/ci.yml"),
        "steps:\n  - run: echo ${{ github.sha }}\n",
    )
    .expect("ci");
    fs::write(
        project.join("{% if license != 'none' %}legal{% endif %}/LICENSE"),
        "{{ license }} License\nCopyright (c) {{ scaffold.year }} {{ author }}\n",
    )
    .expect("license");
    dir
}

fn answers(spec: &TemplateSpec, overrides: &[(&str, &str)]) -> Vec<(String, String)> {
    spec.default_answers()
        .into_iter()
        .map(|(k, v)| {
            let v = overrides
                .iter()
                .find(|(name, _)| *name == k)
                .map(|(_, val)| val.to_string())
                .unwrap_or(v);
            (k, v)
        })
        .collect()
}

#[test]
fn full_template_renders_expected_tree() {
    let templates = TempDir::new().expect("templates");
    let out = TempDir::new().expect("out");
    let dir = make_template(templates.path());

    let spec = TemplateSpec::load(&dir).expect("load spec");
    let ctx = RenderContext::new(&spec, answers(&spec, &[("project_name", "widgets")]));
    let summary = render_tree(&dir, out.path(), &spec, &ctx).expect("render");

    assert_eq!(
        summary.files,
        vec![
            ".github/workflows/ci.yml",
            "Cargo.toml",
            "legal/LICENSE",
            "src/lib.rs",
        ]
    );

    let cargo = fs::read_to_string(out.path().join("Cargo.toml")).expect("read cargo");
    assert!(cargo.contains("name = \"widgets\""));
    assert!(cargo.contains("authors = [\"Jane Doe\"]"));

    let lib = fs::read_to_string(out.path().join("src/lib.rs")).expect("read lib");
    assert_eq!(lib, "//! widgets (rust-lib)\n");

    let ci = fs::read_to_string(out.path().join(".github/workflows/ci.yml")).expect("read ci");
    assert!(ci.contains("${{ github.sha }}"), "ci workflow must be copied verbatim");
}

#[test]
fn conditional_directory_is_dropped() {
    let templates = TempDir::new().expect("templates");
    let out = TempDir::new().expect("out");
    let dir = make_template(templates.path());

    let spec = TemplateSpec::load(&dir).expect("load spec");
    let ctx = RenderContext::new(&spec, answers(&spec, &[("license", "none")]));
    let summary = render_tree(&dir, out.path(), &spec, &ctx).expect("render");

    assert!(!summary.files.iter().any(|f| f.ends_with("LICENSE")));
    assert!(!out.path().join("legal").exists());
    assert_eq!(summary.skipped.len(), 1);
}

#[test]
fn rendering_twice_is_byte_identical() {
    let templates = TempDir::new().expect("templates");
    let first = TempDir::new().expect("first");
    let second = TempDir::new().expect("second");
    let dir = make_template(templates.path());

    let spec = TemplateSpec::load(&dir).expect("load spec");
    let ctx = RenderContext::new(&spec, spec.default_answers());
    let a = render_tree(&dir, first.path(), &spec, &ctx).expect("render 1");
    let b = render_tree(&dir, second.path(), &spec, &ctx).expect("render 2");
    assert_eq!(a, b);
    for file in &a.files {
        assert_eq!(
            fs::read(first.path().join(file)).expect("first"),
            fs::read(second.path().join(file)).expect("second"),
            "{file} differs between renders"
        );
    }
}

#[test]
fn discover_finds_template() {
    let templates = TempDir::new().expect("templates");
    make_template(templates.path());
    let found = discover_templates(templates.path()).expect("discover");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name.0, "rust-lib");
    assert_eq!(found[0].description.as_deref(), Some("Minimal library crate"));
}

#[test]
fn malformed_spec_is_a_parse_error() {
    let templates = TempDir::new().expect("templates");
    let dir = templates.path().join("bad");
    fs::create_dir_all(dir.join("project")).expect("mkdir");
    fs::write(dir.join("template.yaml"), "variables: [unclosed").expect("write");
    let err = TemplateSpec::load(&dir).unwrap_err();
    assert!(matches!(err, RenderError::Parse { .. }), "got: {err}");
}
