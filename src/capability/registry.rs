//! Capability registry: schemas, dispatch by name, evidence aggregation.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{
    invalid_arguments, Capability, CapabilityArguments, CapabilitySchema, ContentSearchCapability,
    OutlineCapability,
};
use crate::evidence::{Evidence, EvidenceSlot};
use crate::repository::ContentRepository;
use crate::types::{Invocation, InvocationResult};

struct Registered {
    capability: Arc<dyn Capability>,
    evidence: EvidenceSlot,
}

/// Ordered set of named capabilities, each with its own evidence slot.
///
/// Dispatch takes `&mut self`, so one registry serves one query at a time.
/// Concurrent queries each need their own registry; build one per query
/// with [`CapabilityRegistry::course_tools`].
#[derive(Default)]
pub struct CapabilityRegistry {
    entries: Vec<Registered>,
}

impl CapabilityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with content search and outline lookup over one repository.
    pub fn course_tools(repository: Arc<dyn ContentRepository>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ContentSearchCapability::new(repository.clone())));
        registry.register(Arc::new(OutlineCapability::new(repository)));
        registry
    }

    /// Register a capability. A capability with the same name is replaced in
    /// place and its evidence slot reset.
    pub fn register(&mut self, capability: Arc<dyn Capability>) {
        debug!(capability = capability.name(), "capability registered");
        let entry = Registered {
            capability,
            evidence: EvidenceSlot::new(),
        };
        match self
            .entries
            .iter_mut()
            .find(|e| e.capability.name() == entry.capability.name())
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Look up a capability by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Capability>> {
        self.entries
            .iter()
            .find(|e| e.capability.name() == name)
            .map(|e| &e.capability)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.capability.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Schemas of every capability, in registration order.
    pub fn schemas(&self) -> Vec<CapabilitySchema> {
        self.entries
            .iter()
            .map(|e| e.capability.schema().clone())
            .collect()
    }

    /// Execute the named capability and return its result text.
    ///
    /// Never fails: unknown names and invalid arguments come back as text.
    /// A successful execution overwrites that capability's evidence slot.
    pub async fn dispatch(&mut self, name: &str, arguments: &serde_json::Value) -> String {
        let Some(index) = self.entries.iter().position(|e| e.capability.name() == name) else {
            warn!(capability = name, "unknown capability requested");
            return format!("Tool '{name}' not found");
        };
        let capability = self.entries[index].capability.clone();

        let args = match CapabilityArguments::decode(arguments.clone()) {
            Ok(args) => args,
            Err(e) => return invalid_arguments(name, e),
        };
        if let Err(reason) = capability.validate(&args) {
            warn!(capability = name, reason = reason.as_str(), "invalid capability arguments");
            return invalid_arguments(name, reason);
        }

        let output = capability.execute(&args).await;
        debug!(
            capability = name,
            evidence = output.evidence.len(),
            "capability executed"
        );
        self.entries[index].evidence.replace(output.evidence);
        output.text
    }

    /// Dispatch one model invocation, tagging the result with its id.
    pub async fn invoke(&mut self, invocation: &Invocation) -> InvocationResult {
        debug!(
            capability = invocation.name.as_str(),
            invocation_id = invocation.id.as_str(),
            "dispatching invocation"
        );
        let content = self.dispatch(&invocation.name, &invocation.arguments).await;
        InvocationResult {
            invocation_id: invocation.id.clone(),
            content,
        }
    }

    /// Current evidence of every capability, concatenated in registration order.
    pub fn collect_evidence(&self) -> Vec<Evidence> {
        self.entries
            .iter()
            .flat_map(|e| e.evidence.items().iter().cloned())
            .collect()
    }

    /// Empty every evidence slot.
    pub fn clear_evidence(&mut self) {
        for entry in &mut self.entries {
            entry.evidence.clear();
        }
    }
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("capabilities", &self.names())
            .finish()
    }
}
