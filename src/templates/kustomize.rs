//! Kustomize base with development, staging and production overlays

use async_trait::async_trait;

use crate::core::request::DEFAULT_KUSTOMIZE_REPLICAS;
use crate::core::{CmdrResult, GenerationRequest, TemplateOptions};
use crate::templates::kubernetes::service_manifest;
use crate::templates::rollback::{transact, RollbackGuard};
use crate::templates::{StaticFileSet, Template, TemplateKind, Toolbox};

pub struct KustomizeTemplate;

/// Overlay environment: directory name, namespace suffix, label
struct Overlay {
    dir: &'static str,
    suffix: &'static str,
    environment: &'static str,
}

const DEVELOPMENT: Overlay = Overlay {
    dir: "development",
    suffix: "dev",
    environment: "development",
};
const STAGING: Overlay = Overlay {
    dir: "staging",
    suffix: "staging",
    environment: "staging",
};
const PRODUCTION: Overlay = Overlay {
    dir: "production",
    suffix: "prod",
    environment: "production",
};

impl KustomizeTemplate {
    pub fn render(name: &str, options: &TemplateOptions) -> StaticFileSet {
        let image = options.image();
        let port = options.port();
        let replicas = options.replicas_or(DEFAULT_KUSTOMIZE_REPLICAS);

        let mut files = StaticFileSet::new();

        // The base leaves replicas to the overlays.
        files.add(
            "base/deployment.yaml",
            format!(
                r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: {name}
  labels:
    app: {name}
spec:
  selector:
    matchLabels:
      app: {name}
  template:
    metadata:
      labels:
        app: {name}
    spec:
      containers:
      - name: {name}
        image: {image}
        ports:
        - containerPort: {port}
        resources:
          limits:
            cpu: "0.5"
            memory: "512Mi"
          requests:
            cpu: "0.2"
            memory: "256Mi"
"#
            ),
        );
        files.add("base/service.yaml", service_manifest(name, port));
        files.add(
            "base/kustomization.yaml",
            format!(
                r#"apiVersion: kustomize.config.k8s.io/v1beta1
kind: Kustomization

resources:
  - deployment.yaml
  - service.yaml

commonLabels:
  app: {name}
"#
            ),
        );

        let replica_patch = |count: u32| {
            format!(
                r#"      - op: replace
        path: /spec/replicas
        value: {count}
"#
            )
        };
        let production_resources = r#"      - op: replace
        path: /spec/template/spec/containers/0/resources/limits/cpu
        value: "1"
      - op: replace
        path: /spec/template/spec/containers/0/resources/limits/memory
        value: "1Gi"
      - op: replace
        path: /spec/template/spec/containers/0/resources/requests/cpu
        value: "0.5"
      - op: replace
        path: /spec/template/spec/containers/0/resources/requests/memory
        value: "512Mi"
"#;

        add_overlay(&mut files, name, &DEVELOPMENT, &replica_patch(1));
        add_overlay(&mut files, name, &STAGING, &replica_patch(2));
        add_overlay(
            &mut files,
            name,
            &PRODUCTION,
            &format!("{}{}", replica_patch(replicas), production_resources),
        );

        files.add(
            "README.md",
            format!(
                r#"# {name}

Kubernetes manifests for {name} using Kustomize.

## Structure
- `base/`: Base Kubernetes manifests
- `overlays/`: Environment-specific configurations
  - `development/`: Development environment (1 replica)
  - `staging/`: Staging environment (2 replicas)
  - `production/`: Production environment ({replicas} replicas)

## Deployment
To deploy to your Kubernetes cluster:

### Development
```bash
kubectl apply -k overlays/development
```

### Staging
```bash
kubectl apply -k overlays/staging
```

### Production
```bash
kubectl apply -k overlays/production
```

## Configuration
- Base Image: {image}
- Container Port: {port}
- Production Replicas: {replicas}

### Environment Configurations
- Development: 1 replica, minimal resources
- Staging: 2 replicas, minimal resources
- Production: {replicas} replicas, increased resources (CPU: 1 core, Memory: 1Gi)

### Preview Changes
To preview changes before applying:
```bash
# Development
kubectl kustomize overlays/development

# Staging
kubectl kustomize overlays/staging

# Production
kubectl kustomize overlays/production
```
"#
            ),
        );

        files
    }
}

fn add_overlay(files: &mut StaticFileSet, name: &str, overlay: &Overlay, operations: &str) {
    let namespace = format!("{}-{}", name, overlay.suffix);
    let environment = overlay.environment;

    files.add(
        format!("overlays/{}/namespace.yaml", overlay.dir),
        format!(
            r#"apiVersion: v1
kind: Namespace
metadata:
  name: {namespace}
"#
        ),
    );
    files.add(
        format!("overlays/{}/kustomization.yaml", overlay.dir),
        format!(
            r#"apiVersion: kustomize.config.k8s.io/v1beta1
kind: Kustomization

namespace: {namespace}

resources:
  - ../../base
  - namespace.yaml

patches:
  - patch: |-
{operations}    target:
      kind: Deployment
      name: {name}

commonLabels:
  environment: {environment}
"#
        ),
    );
}

#[async_trait]
impl Template for KustomizeTemplate {
    fn kind(&self) -> TemplateKind {
        TemplateKind::KubernetesKustomize
    }

    async fn generate(&self, request: &GenerationRequest, _tools: Toolbox<'_>) -> CmdrResult<()> {
        let guard = RollbackGuard::directory(&request.target)?;
        let files = Self::render(&request.name, &request.options);
        transact(guard, files.write_to(&request.target)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gitignore::testing::StaticGitignore;
    use crate::vcs::testing::RecordingVcs;
    use tempfile::tempdir;

    #[test]
    fn test_layout() {
        let files = KustomizeTemplate::render("demo", &TemplateOptions::default());
        let paths: Vec<_> = files.paths().map(|p| p.to_string_lossy().into_owned()).collect();
        assert_eq!(
            paths,
            vec![
                "base/deployment.yaml",
                "base/service.yaml",
                "base/kustomization.yaml",
                "overlays/development/namespace.yaml",
                "overlays/development/kustomization.yaml",
                "overlays/staging/namespace.yaml",
                "overlays/staging/kustomization.yaml",
                "overlays/production/namespace.yaml",
                "overlays/production/kustomization.yaml",
                "README.md",
            ]
        );
    }

    #[test]
    fn test_production_defaults_to_three_replicas() {
        let files = KustomizeTemplate::render("demo", &TemplateOptions::default());

        let production = files.get("overlays/production/kustomization.yaml").unwrap();
        assert!(production.contains("namespace: demo-prod\n"));
        assert!(production.contains("        path: /spec/replicas\n        value: 3\n"));
        assert!(production.contains("value: \"1Gi\""));
        assert!(production.contains("  environment: production\n"));

        let development = files.get("overlays/development/kustomization.yaml").unwrap();
        assert!(development.contains("value: 1\n"));
        assert!(!development.contains("1Gi"));

        let staging = files.get("overlays/staging/kustomization.yaml").unwrap();
        assert!(staging.contains("value: 2\n"));

        assert_eq!(
            files.get("overlays/production/namespace.yaml").unwrap(),
            "apiVersion: v1\nkind: Namespace\nmetadata:\n  name: demo-prod\n"
        );
        assert!(files
            .get("overlays/development/namespace.yaml")
            .unwrap()
            .contains("name: demo-dev"));
    }

    #[test]
    fn test_patch_block_shape() {
        let files = KustomizeTemplate::render("demo", &TemplateOptions::default());
        let staging = files.get("overlays/staging/kustomization.yaml").unwrap();
        assert!(staging.contains(
            "patches:\n  - patch: |-\n      - op: replace\n        path: /spec/replicas\n        value: 2\n    target:\n      kind: Deployment\n      name: demo\n"
        ));
    }

    #[test]
    fn test_explicit_options() {
        let options = TemplateOptions {
            image: Some("registry.local/api:7".to_string()),
            port: Some(9000),
            replicas: Some(5),
            ..Default::default()
        };
        let files = KustomizeTemplate::render("api", &options);

        let base = files.get("base/deployment.yaml").unwrap();
        assert!(base.contains("image: registry.local/api:7\n"));
        assert!(base.contains("containerPort: 9000\n"));
        assert!(!base.contains("replicas"));
        assert!(files.get("base/service.yaml").unwrap().contains("port: 9000\n"));
        assert!(files
            .get("overlays/production/kustomization.yaml")
            .unwrap()
            .contains("value: 5\n"));
        assert!(files.get("README.md").unwrap().contains("- Production Replicas: 5\n"));
    }

    #[tokio::test]
    async fn test_generate_writes_tree() {
        let dir = tempdir().unwrap();
        let vcs = RecordingVcs::with_fixture(&[]);
        let gitignore = StaticGitignore::not_found();
        let tools = Toolbox { vcs: &vcs, gitignore: &gitignore };
        let request = GenerationRequest::new("catalog", dir.path(), TemplateOptions::default()).unwrap();

        KustomizeTemplate.generate(&request, tools).await.unwrap();

        let root = dir.path().join("catalog");
        for overlay in ["development", "staging", "production"] {
            assert!(root.join("overlays").join(overlay).join("kustomization.yaml").exists());
            assert!(root.join("overlays").join(overlay).join("namespace.yaml").exists());
        }
        assert!(root.join("base/kustomization.yaml").exists());
    }
}
