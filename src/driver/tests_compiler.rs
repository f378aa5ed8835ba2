use super::*;
use crate::shader::ShaderStage;
use crate::test_utils::{config, fake_compiler_invocations, list_files, write_fake_compiler, write_shader};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

struct Fixture {
    _dir: tempfile::TempDir,
    source: PathBuf,
    output: PathBuf,
    tools: PathBuf,
}

fn fixture(shaders: &[&str]) -> Fixture {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("shaders");
    let tools = dir.path().join("tools");
    for shader in shaders {
        write_shader(&source, shader).unwrap();
    }
    let output = source.join("compiled");
    Fixture {
        source,
        output,
        tools,
        _dir: dir,
    }
}

fn driver_for(fixture: &Fixture, extra: &[&str]) -> ShaderDriver {
    let script = write_fake_compiler(&fixture.tools).unwrap();
    let mut args = vec![
        "shaderbake".to_string(),
        fixture.source.to_string_lossy().into_owned(),
        "--compiler".to_string(),
        config::SHELL.to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    args.push("--".to_string());
    args.push(script.to_string_lossy().into_owned());
    ShaderDriver::new(Cli::parse_from(args))
}

#[test]
fn test_compiles_every_shader_into_mirrored_tree() {
    let fx = fixture(&["mesh.vert", "mesh.frag", "post/blur.frag", "post/deep/fxaa.vert", "lib/common.glsl"]);
    let driver = driver_for(&fx, &[]);

    let report = driver.run().unwrap();
    assert_eq!(report.total(), 4);
    assert_eq!(report.succeeded(), 4);
    assert!(!report.cleaned);

    assert_eq!(
        list_files(&fx.output),
        vec!["mesh.frag.spv", "mesh.vert.spv", "post/blur.frag.spv", "post/deep/fxaa.vert.spv"]
    );
    let stages: Vec<_> = report.artifacts.iter().map(|a| a.stage).collect();
    assert_eq!(
        stages,
        vec![
            ShaderStage::Fragment,
            ShaderStage::Vertex,
            ShaderStage::Fragment,
            ShaderStage::Vertex
        ]
    );
    assert_eq!(
        fs::read_to_string(fx.output.join("mesh.vert.spv")).unwrap(),
        crate::test_utils::SHADER_SOURCE
    );
}

#[test]
fn test_previous_output_is_removed() {
    let fx = fixture(&["mesh.vert"]);
    write_shader(&fx.output, "stale/old.frag.spv").unwrap();
    write_shader(&fx.output, "leftover.txt").unwrap();

    let report = driver_for(&fx, &[]).run().unwrap();
    assert!(report.cleaned);
    assert_eq!(list_files(&fx.output), vec!["mesh.vert.spv"]);
}

#[test]
fn test_failure_does_not_stop_remaining_shaders() {
    let fx = fixture(&["a.vert", "b_broken.frag", "c.frag"]);
    let driver = driver_for(&fx, &[]);

    let err = driver.run().unwrap_err();
    assert!(matches!(err, DriverError::CompilationFailed { failed: 1, total: 3 }));
    assert_eq!(list_files(&fx.output), vec!["a.vert.spv", "c.frag.spv"]);
    assert_eq!(fake_compiler_invocations(&fx.tools).len(), 3);
}

#[test]
fn test_report_records_failures() {
    let fx = fixture(&["ok.vert", "broken.frag"]);
    let driver = driver_for(&fx, &[]);

    let report = driver.compile_all(Path::new(config::SHELL)).unwrap();
    assert!(report.has_failures());
    assert_eq!(report.failed(), 1);
    let failed: Vec<_> = report.failures().map(|a| a.source.file_name().unwrap().to_owned()).collect();
    assert_eq!(failed, vec!["broken.frag"]);
    assert!(matches!(
        report.failures().next().unwrap().outcome,
        CompileOutcome::CompilerFailed(_)
    ));
}

#[test]
fn test_compiler_args_precede_input() {
    let fx = fixture(&["mesh.vert"]);
    let script = write_fake_compiler(&fx.tools).unwrap();
    let build = BuildConfig {
        compiler_args: vec![script.to_string_lossy().into_owned(), "-O".into(), "-g".into()],
        ..BuildConfig::new(&fx.source)
    };
    ShaderDriver::from_config(build)
        .compile_all(Path::new(config::SHELL))
        .unwrap();

    let calls = fake_compiler_invocations(&fx.tools);
    assert_eq!(calls.len(), 1);
    let input = fx.source.join("mesh.vert");
    let output = fx.output.join("mesh.vert.spv");
    assert_eq!(calls[0], format!("-O -g {} -o {}", input.display(), output.display()));
}

#[test]
fn test_dry_run_touches_nothing() {
    let fx = fixture(&["mesh.vert", "post/blur.frag"]);
    write_shader(&fx.output, "old.vert.spv").unwrap();

    let report = driver_for(&fx, &["--dry-run"]).run().unwrap();
    assert!(report.cleaned);
    assert_eq!(report.total(), 2);
    assert!(report.artifacts.iter().all(|a| matches!(a.outcome, CompileOutcome::Planned)));
    assert_eq!(list_files(&fx.output), vec!["old.vert.spv"]);
    assert!(fake_compiler_invocations(&fx.tools).is_empty());
}

#[test]
fn test_missing_compiler_is_recorded_per_shader() {
    let fx = fixture(&["a.vert", "sub/b.frag"]);
    let missing = fx.tools.join("no-such-glslc");

    let report = compile_all(&fx.source, &fx.output, &missing).unwrap();
    assert_eq!(report.total(), 2);
    assert_eq!(report.failed(), 2);
    assert!(report
        .artifacts
        .iter()
        .all(|a| matches!(a.outcome, CompileOutcome::SpawnFailed(_))));
    // parent directories are created before the compiler runs
    assert!(fx.output.join("sub").is_dir());
}

#[test]
fn test_missing_source_root() {
    let fx = fixture(&[]);
    let err = compile_all(&fx.source, &fx.output, Path::new(config::SHELL)).unwrap_err();
    assert!(matches!(err, DriverError::MissingSourceRoot(_)));
}

#[test]
fn test_refuses_to_clear_source_tree() {
    let fx = fixture(&["mesh.vert"]);
    let err = compile_all(&fx.source, &fx.source, Path::new(config::SHELL)).unwrap_err();
    assert!(matches!(err, DriverError::OutputContainsSources(_)));
    assert!(fx.source.join("mesh.vert").is_file());

    let parent = fx.source.parent().unwrap();
    let err = compile_all(&fx.source, parent, Path::new(config::SHELL)).unwrap_err();
    assert!(matches!(err, DriverError::OutputContainsSources(_)));
}

#[test]
fn test_output_outside_source_tree() {
    let fx = fixture(&["mesh.vert"]);
    let script = write_fake_compiler(&fx.tools).unwrap();
    let elsewhere = fx.tools.join("spv");
    let build = BuildConfig {
        output_dir: elsewhere.clone(),
        compiler_args: vec![script.to_string_lossy().into_owned()],
        ..BuildConfig::new(&fx.source)
    };

    let report = ShaderDriver::from_config(build)
        .compile_all(Path::new(config::SHELL))
        .unwrap();
    assert_eq!(report.succeeded(), 1);
    assert_eq!(list_files(&elsewhere), vec!["mesh.vert.spv"]);
    assert!(!fx.output.exists());
}

#[test]
fn test_unreadable_subdirectory_does_not_stop_build() {
    use std::os::unix::fs::symlink;

    let fx = fixture(&["a.vert", "nested/b.frag"]);
    write_shader(&fx.output, "old.vert.spv").unwrap();
    symlink(&fx.source, fx.source.join("nested").join("loop")).unwrap();

    let report = driver_for(&fx, &[]).run().unwrap();
    assert!(report.cleaned);
    assert_eq!(list_files(&fx.output), vec!["a.vert.spv", "nested/b.frag.spv"]);
}

#[test]
fn test_old_output_survives_unreadable_source_root() {
    use std::os::unix::fs::PermissionsExt;

    let fx = fixture(&["a.vert"]);
    write_shader(&fx.output, "old.vert.spv").unwrap();
    fs::set_permissions(&fx.source, fs::Permissions::from_mode(0o000)).unwrap();

    // privileged users can still list the directory
    if fs::read_dir(&fx.source).is_ok() {
        fs::set_permissions(&fx.source, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = driver_for(&fx, &[]).run();
    fs::set_permissions(&fx.source, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(matches!(result, Err(DriverError::Walk(_))));
    assert_eq!(list_files(&fx.output), vec!["old.vert.spv"]);
    assert!(fake_compiler_invocations(&fx.tools).is_empty());
}
