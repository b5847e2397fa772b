//! Plain Kubernetes manifests

use async_trait::async_trait;

use crate::core::request::DEFAULT_REPLICAS;
use crate::core::{CmdrResult, GenerationRequest, TemplateOptions};
use crate::templates::rollback::{transact, RollbackGuard};
use crate::templates::{StaticFileSet, Template, TemplateKind, Toolbox};

/// Deployment, service and README for a single workload
pub struct KubernetesTemplate;

impl KubernetesTemplate {
    pub fn render(name: &str, options: &TemplateOptions) -> StaticFileSet {
        let image = options.image();
        let port = options.port();
        let replicas = options.replicas_or(DEFAULT_REPLICAS);

        let mut files = StaticFileSet::new();
        files.add(
            "deployment.yaml",
            format!(
                r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: {name}
  labels:
    app: {name}
spec:
  replicas: {replicas}
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
        files.add("service.yaml", service_manifest(name, port));
        files.add(
            "README.md",
            format!(
                r#"# {name}

Kubernetes manifests for {name}.

## Components
- Deployment: `deployment.yaml`
- Service: `service.yaml`

## Deployment
To deploy to your Kubernetes cluster:

```bash
kubectl apply -f deployment.yaml
kubectl apply -f service.yaml
```

## Configuration
- Image: {image}
- Port: {port}
- Replicas: {replicas}
"#
            ),
        );
        files
    }
}

/// ClusterIP service exposing `port`
pub(crate) fn service_manifest(name: &str, port: u16) -> String {
    format!(
        r#"apiVersion: v1
kind: Service
metadata:
  name: {name}
spec:
  selector:
    app: {name}
  ports:
    - protocol: TCP
      port: {port}
      targetPort: {port}
  type: ClusterIP
"#
    )
}

#[async_trait]
impl Template for KubernetesTemplate {
    fn kind(&self) -> TemplateKind {
        TemplateKind::Kubernetes
    }

    async fn generate(&self, request: &GenerationRequest, _tools: Toolbox<'_>) -> CmdrResult<()> {
        let guard = RollbackGuard::directory(&request.target)?;
        let files = Self::render(&request.name, &request.options);
        transact(guard, files.write_to(&request.target)).await
    }
}
