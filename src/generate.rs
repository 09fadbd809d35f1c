//! Proxy generation pipeline
//!
//! locate target -> classify -> pick strategy -> extract operations -> build

use crate::builder::{BuildRequest, ProxyTemplate, Strategy};
use crate::classify::{classify, TargetClassification, TargetShape};
use crate::config::Config;
use crate::error::{ProxyError, ProxyResult};
use crate::source::{
    extract_public_operations, parse_headers, DeclarationSource, FsDeclarationSource,
    MethodSignature, NameContext, TypeHeader,
};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What generation would produce for a target, without the source text
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub target: String,
    pub classification: TargetClassification,
    pub strategy: Strategy,
    pub operations: Vec<MethodSignature>,
}

/// A generated proxy declaration
#[derive(Debug, Clone)]
pub struct GeneratedProxy {
    pub identifier: String,
    pub target: String,
    pub classification: TargetClassification,
    pub strategy: Strategy,
    /// Full declaration text, written verbatim to the cache
    pub source: String,
}

/// Runs classifier, transformer and builder for one target
pub struct ProxyGenerator {
    source: Arc<dyn DeclarationSource>,
    runtime: HashSet<String>,
    template: ProxyTemplate,
}

impl ProxyGenerator {
    pub fn new(
        source: Arc<dyn DeclarationSource>,
        runtime: impl IntoIterator<Item = String>,
        template: ProxyTemplate,
    ) -> Self {
        Self {
            source,
            runtime: runtime.into_iter().collect(),
            template,
        }
    }

    /// Generator reading declarations from the configured source roots
    pub fn from_config(config: &Config) -> Self {
        let source = FsDeclarationSource::new(
            config.sources.roots.clone(),
            config.sources.extension.clone(),
        );
        Self::new(
            Arc::new(source),
            config.sources.runtime_interfaces.iter().cloned(),
            ProxyTemplate::from(&config.proxy),
        )
    }

    /// Classify `target` and collect its operations
    pub async fn inspect(&self, identifier: &str, target: &str) -> ProxyResult<Inspection> {
        let target = target.trim_start_matches('.');

        let Some(text) = self.source.locate(target).await? else {
            if self.runtime.contains(target) {
                debug!("{} is a runtime interface", target);
                return Ok(self.finish(target, TargetClassification::InternalInterface, Vec::new()));
            }
            return Err(ProxyError::TargetNotFound {
                identifier: identifier.to_string(),
                target: target.to_string(),
            });
        };

        let header = header_of(&text, target)?;
        let parent = self.abstract_parent(&text, &header).await;
        let classification = classify(&TargetShape::Declared { header, parent });
        let operations = extract_public_operations(&text, target, &self.runtime);

        Ok(self.finish(target, classification, operations))
    }

    /// Produce the proxy declaration for `identifier`
    pub async fn generate(&self, identifier: &str, target: &str) -> ProxyResult<GeneratedProxy> {
        let inspection = self.inspect(identifier, target).await?;

        let source = inspection.strategy.build(&BuildRequest {
            template: &self.template,
            identifier,
            target: &inspection.target,
            classification: inspection.classification,
            operations: &inspection.operations,
        });

        info!(
            "Generated {} proxy for {} ({} operation(s))",
            inspection.strategy,
            identifier,
            inspection.operations.len()
        );

        Ok(GeneratedProxy {
            identifier: identifier.to_string(),
            target: inspection.target,
            classification: inspection.classification,
            strategy: inspection.strategy,
            source,
        })
    }

    fn finish(
        &self,
        target: &str,
        classification: TargetClassification,
        operations: Vec<MethodSignature>,
    ) -> Inspection {
        let strategy = Strategy::for_classification(classification);
        if strategy == Strategy::Fallback {
            warn!(
                "{} is {}, using fallback proxy without type relationship",
                target, classification
            );
        }
        Inspection {
            target: target.to_string(),
            classification,
            strategy,
            operations,
        }
    }

    /// Header of the parent class, looked up only for abstract classes
    async fn abstract_parent(&self, text: &str, header: &TypeHeader) -> Option<TypeHeader> {
        if header.is_interface() || header.is_final || !header.is_abstract {
            return None;
        }
        let written = header.extends.first()?;

        let file = parse_headers(text).ok()?;
        let parent = NameContext::new(&file, &self.runtime).resolve(written);

        if let Some(decl) = file.find(&parent) {
            return Some(decl.header.clone());
        }

        let parent_text = match self.source.locate(&parent).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                debug!("Parent {} has no declaration, treated as concrete", parent);
                return None;
            }
            Err(e) => {
                warn!("Cannot read parent {}: {}", parent, e);
                return None;
            }
        };

        parse_headers(&parent_text)
            .ok()?
            .find(&parent)
            .map(|decl| decl.header.clone())
    }
}

fn header_of(text: &str, target: &str) -> ProxyResult<TypeHeader> {
    let file = parse_headers(text).map_err(|e| ProxyError::TargetUnparsable {
        target: target.to_string(),
        reason: e.to_string(),
    })?;

    file.find(target)
        .map(|decl| decl.header.clone())
        .ok_or_else(|| ProxyError::TargetUnparsable {
            target: target.to_string(),
            reason: "its file does not declare it".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryDeclarationSource;

    const MAILER: &str = r#"
        namespace services;
        use mail.Message;

        class Mailer {
            public fn send(message: Message) -> bool { return true; }
            private fn encode(message: Message) -> string { return ""; }
            public fn queue(message: Message, delay: int = 0) -> void { }
        }
    "#;

    fn generator(source: MemoryDeclarationSource) -> ProxyGenerator {
        ProxyGenerator::new(
            Arc::new(source),
            ["Countable".to_string()],
            ProxyTemplate::default(),
        )
    }

    #[tokio::test]
    async fn mailer_service_scenario() {
        let gen = generator(MemoryDeclarationSource::new().with("services.Mailer", MAILER));
        let proxy = gen.generate("MailerService", "services.Mailer").await.unwrap();

        assert_eq!(proxy.classification, TargetClassification::PlainClass);
        assert_eq!(proxy.strategy, Strategy::Class);
        assert!(proxy.source.contains("namespace lazy.proxies;"));
        assert!(proxy
            .source
            .contains("class MailerService extends .services.Mailer {"));
        assert!(proxy.source.contains("fn send(message: .mail.Message) -> bool"));
        assert!(proxy
            .source
            .contains("fn queue(message: .mail.Message, delay: int = 0) -> void"));
        assert!(!proxy.source.contains("encode"));
        assert!(proxy.source.find("fn send").unwrap() < proxy.source.find("fn queue").unwrap());
    }

    #[tokio::test]
    async fn interface_target_uses_interface_strategy() {
        let gen = generator(
            MemoryDeclarationSource::new()
                .with("q.Queue", "namespace q;\ninterface Queue { fn size() -> int; }"),
        );
        let inspection = gen.inspect("Queue", ".q.Queue").await.unwrap();

        assert_eq!(inspection.target, "q.Queue");
        assert_eq!(inspection.classification, TargetClassification::PlainInterface);
        assert_eq!(inspection.strategy, Strategy::Interface);
        assert_eq!(inspection.operations.len(), 1);
    }

    #[tokio::test]
    async fn nested_abstract_falls_back() {
        let gen = generator(
            MemoryDeclarationSource::new()
                .with(
                    "app.Repo",
                    "namespace app;\nabstract class Repo extends BaseRepo { public fn all() -> array; }",
                )
                .with("app.BaseRepo", "namespace app;\nabstract class BaseRepo {}"),
        );
        let inspection = gen.inspect("Repo", "app.Repo").await.unwrap();

        assert_eq!(inspection.classification, TargetClassification::NestedAbstract);
        assert_eq!(inspection.strategy, Strategy::Fallback);
        assert_eq!(inspection.operations.len(), 1);
    }

    #[tokio::test]
    async fn nested_abstract_in_same_file_falls_back() {
        let gen = generator(MemoryDeclarationSource::new().with(
            "app.Repo",
            "namespace app;\nabstract class BaseRepo {}\nabstract class Repo extends BaseRepo { public fn all() -> array; }",
        ));
        let inspection = gen.inspect("Repo", "app.Repo").await.unwrap();

        assert_eq!(inspection.classification, TargetClassification::NestedAbstract);
        assert_eq!(inspection.strategy, Strategy::Fallback);
    }

    #[tokio::test]
    async fn abstract_with_missing_parent_is_plain() {
        let gen = generator(MemoryDeclarationSource::new().with(
            "app.Repo",
            "namespace app;\nabstract class Repo extends BaseRepo {}",
        ));
        let inspection = gen.inspect("Repo", "app.Repo").await.unwrap();
        assert_eq!(inspection.classification, TargetClassification::PlainClass);
    }

    #[tokio::test]
    async fn final_target_still_forwards() {
        let gen = generator(MemoryDeclarationSource::new().with(
            "services.Mailer",
            "namespace services;\nfinal class Mailer { public fn send() -> bool { } }",
        ));
        let proxy = gen.generate("MailerService", "services.Mailer").await.unwrap();

        assert_eq!(proxy.strategy, Strategy::Fallback);
        assert!(proxy.source.contains("// fallback: target is final"));
        assert!(proxy.source.contains("return this.__resolve().send();"));
    }

    #[tokio::test]
    async fn runtime_interface_without_source() {
        let gen = generator(MemoryDeclarationSource::new());
        let inspection = gen.inspect("Counter", "Countable").await.unwrap();

        assert_eq!(
            inspection.classification,
            TargetClassification::InternalInterface
        );
        assert_eq!(inspection.strategy, Strategy::Fallback);
        assert!(inspection.operations.is_empty());
    }

    #[tokio::test]
    async fn unknown_target_is_an_error() {
        let gen = generator(MemoryDeclarationSource::new());
        let err = gen.generate("MailerService", "services.Mailer").await.unwrap_err();
        assert!(matches!(err, ProxyError::TargetNotFound { .. }));
    }

    #[tokio::test]
    async fn unparsable_header_is_an_error() {
        let gen = generator(
            MemoryDeclarationSource::new().with("services.Mailer", "class class {"),
        );
        let err = gen.inspect("MailerService", "services.Mailer").await.unwrap_err();
        assert!(matches!(err, ProxyError::TargetUnparsable { .. }));
    }

    #[tokio::test]
    async fn malformed_body_still_classifies() {
        let gen = generator(MemoryDeclarationSource::new().with(
            "services.Mailer",
            "namespace services;\nclass Mailer { public fn send( }",
        ));
        let inspection = gen.inspect("MailerService", "services.Mailer").await.unwrap();

        assert_eq!(inspection.classification, TargetClassification::PlainClass);
        assert!(inspection.operations.is_empty());
    }
}
