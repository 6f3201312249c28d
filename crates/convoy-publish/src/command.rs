use std::path::Path;

/// Scope name under which a registry URL override is wired into the
/// invocation environment. The override registry is addressed as
/// `--registry convoy-override` with `CARGO_REGISTRIES_CONVOY_OVERRIDE_*`
/// variables, so the auth token is namespaced by the same scope and
/// never leaks to the default registry.
#[must_use]
pub fn registry_scope() -> &'static str {
    "convoy-override"
}

const REGISTRY_INDEX_ENV: &str = "CARGO_REGISTRIES_CONVOY_OVERRIDE_INDEX";
const REGISTRY_TOKEN_ENV: &str = "CARGO_REGISTRIES_CONVOY_OVERRIDE_TOKEN";
const DEFAULT_TOKEN_ENV: &str = "CARGO_REGISTRY_TOKEN";

/// Per-run knobs of the external publish invocation. All of this is
/// interface plumbing; the publish tool itself is an external
/// collaborator.
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// Alternate registry URL; also suppresses tagging at the
    /// orchestration layer.
    pub registry_url: Option<String>,
    /// Auth token, passed through the environment, never on argv.
    pub token: Option<String>,
    /// Distribution tag forwarded verbatim to the publish tool.
    pub dist_tag: Option<String>,
    pub force: bool,
    /// Report the intended command instead of executing it.
    pub dry_run: bool,
}

/// Arguments of the publish invocation for one package.
#[must_use]
pub fn publish_args(manifest_path: &Path, options: &PublishOptions) -> Vec<String> {
    let mut args = vec![
        "publish".to_string(),
        "--manifest-path".to_string(),
        manifest_path.display().to_string(),
    ];

    if options.registry_url.is_some() {
        args.push("--registry".to_string());
        args.push(registry_scope().to_string());
    }

    if let Some(dist_tag) = &options.dist_tag {
        args.push("--tag".to_string());
        args.push(dist_tag.clone());
    }

    if options.force {
        args.push("--allow-dirty".to_string());
    }

    args
}

/// Environment of the publish invocation: the registry override and the
/// token, namespaced by the override scope when one is present.
#[must_use]
pub fn publish_env(options: &PublishOptions) -> Vec<(String, String)> {
    let mut env = Vec::new();

    if let Some(url) = &options.registry_url {
        env.push((REGISTRY_INDEX_ENV.to_string(), url.clone()));
        if let Some(token) = &options.token {
            env.push((REGISTRY_TOKEN_ENV.to_string(), token.clone()));
        }
    } else if let Some(token) = &options.token {
        env.push((DEFAULT_TOKEN_ENV.to_string(), token.clone()));
    }

    env
}
