//! End-to-end tests: walk a real tree, index it, write every backend.

use vfsc_config::testing::TestEnvironment;
use vfsc_emit::{digest_file, ArtifactWriter, Backend};
use vfsc_manifest::{index, Resolution, Router};

fn sample_env() -> anyhow::Result<TestEnvironment> {
    let env = TestEnvironment::new()?;
    env.create_file("a.txt", b"hi")?;
    env.create_file("sub/index.html", b"<p>x</p>")?;
    env.create_file("sub/index.json", b"{}")?;
    env.create_file("img/logo.bin", &(0u8..=255).collect::<Vec<_>>())?;
    Ok(env)
}

fn generate(env: &TestEnvironment, backend: Backend, name: &str) -> anyhow::Result<String> {
    let entries = vfsc_scan::walk(&env.source_root)?;
    let (catalog, redirects) = index(entries);
    let emitter = backend.emitter("vfs")?;
    let summary = ArtifactWriter::new(env.output_path(name)).write(
        emitter.as_ref(),
        &catalog,
        &redirects,
    )?;
    Ok(summary.digest)
}

#[test]
fn test_generation_is_deterministic() -> anyhow::Result<()> {
    let env = sample_env()?;
    for backend in Backend::ALL {
        let first_name = format!("first.{}", backend.extension());
        let second_name = format!("second.{}", backend.extension());
        let first = generate(&env, backend, &first_name)?;
        let second = generate(&env, backend, &second_name)?;

        assert_eq!(first, second, "{backend} output differs between runs");
        assert_eq!(env.read_output(&first_name)?, env.read_output(&second_name)?);
        assert_eq!(digest_file(env.output_path(&first_name))?, first);
    }
    Ok(())
}

#[test]
fn test_json_round_trips_every_file() -> anyhow::Result<()> {
    let env = sample_env()?;
    generate(&env, Backend::Json, "vfs.json")?;

    let doc: serde_json::Value = serde_json::from_slice(&env.read_output("vfs.json")?)?;
    let files = doc["files"].as_array().unwrap();
    assert_eq!(files.len(), 4);

    for file in files {
        let path = file["path"].as_str().unwrap();
        assert!(path.starts_with('/'));
        assert!(!path.contains('\\'));

        let data: Vec<u8> = file["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b.as_u64().unwrap() as u8)
            .collect();
        assert_eq!(file["length"].as_u64().unwrap() as usize, data.len());

        let original = std::fs::read(env.source_root.join(&path[1..]))?;
        assert_eq!(data, original, "bytes of {path}");
    }

    assert_eq!(
        doc["index_files"],
        serde_json::json!({ "/sub/": "/sub/index.html" })
    );
    Ok(())
}

#[test]
fn test_odin_artifact_for_example_tree() -> anyhow::Result<()> {
    let env = TestEnvironment::new()?;
    env.create_file("a.txt", b"hi")?;
    env.create_file("sub/index.html", b"<p>x</p>")?;
    generate(&env, Backend::Odin, "vfs.odin")?;

    let text = String::from_utf8(env.read_output("vfs.odin")?)?;
    assert_eq!(text.matches("\t\tpath = ").count(), 2);
    assert!(text.contains("{directory = \"/sub/\", index = \"/sub/index.html\"}"));
    assert!(!text.contains("directory = \"/\""));
    Ok(())
}

#[test]
fn test_empty_tree_produces_valid_artifacts() -> anyhow::Result<()> {
    let env = TestEnvironment::new()?;
    for backend in Backend::ALL {
        let name = format!("vfs.{}", backend.extension());
        generate(&env, backend, &name)?;
        assert!(env.output_path(&name).exists());
    }

    let doc: serde_json::Value = serde_json::from_slice(&env.read_output("vfs.json")?)?;
    assert_eq!(doc["files"], serde_json::json!([]));
    assert_eq!(doc["index_files"], serde_json::json!({}));
    Ok(())
}

#[test]
fn test_router_over_walked_tree() -> anyhow::Result<()> {
    let env = sample_env()?;
    let (catalog, redirects) = index(vfsc_scan::walk(&env.source_root)?);
    let router = Router::new(&catalog, &redirects, |p: &str| {
        if p.ends_with(".html") {
            "text/html".to_string()
        } else {
            "application/octet-stream".to_string()
        }
    });

    assert_eq!(router.resolve("/a.txt").status(), 200);
    assert!(matches!(
        router.resolve("/sub"),
        Resolution::Redirect { location } if location.as_str() == "/sub/index.html"
    ));
    assert_eq!(router.resolve("/img").status(), 404);
    assert_eq!(router.resolve("/nope.css"), Resolution::NotFound);
    Ok(())
}
