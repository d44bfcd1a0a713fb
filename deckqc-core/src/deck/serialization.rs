use crate::types::*;
use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

impl StructuredDeck {
    /// Rebuild the deck text from sections alone: preamble content first,
    /// then each header line followed by its content, in document order.
    ///
    /// Exact for any deck except one corner: a section body consisting of a
    /// single blank line stores the same empty content as a body with no
    /// lines at all, so that blank line is not reproduced.
    pub fn reconstruct_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for section in &self.sections {
            if !section.is_preamble() {
                parts.push(&section.header_line);
            }
            if !section.content.is_empty() || section.is_preamble() {
                parts.push(&section.content);
            }
        }
        parts.join("\n")
    }

    /// Text+id pairs for the retrieval side: the whole deck, every section,
    /// and every extracted table. Repeated section keywords share an id, so
    /// an insertion-ordered index keeps the last occurrence, consistent
    /// with the by-name lookup on the deck itself.
    pub fn documents(&self) -> Vec<DeckDocument> {
        let mut docs = Vec::with_capacity(1 + self.sections.len() + self.vfp.len() + self.pvt.len());

        docs.push(DeckDocument {
            id: format!("deck:{}", self.name),
            text: self.reconstruct_text(),
        });

        for section in &self.sections {
            let text = if section.is_preamble() {
                section.content.clone()
            } else {
                format!("{}\n{}", section.header_line, section.content)
            };
            docs.push(DeckDocument {
                id: format!("section:{}", section.name),
                text,
            });
        }

        for kind in [TableKind::Vfp, TableKind::Pvt] {
            for (number, table) in &self.tables(kind).tables {
                docs.push(DeckDocument {
                    id: format!("{}:{}", kind.prefix().to_lowercase(), number),
                    text: table.content.clone(),
                });
            }
        }

        docs
    }
}

impl DeckReport {
    /// Stamp a finished QC run into its serialization-ready form.
    pub fn assemble(
        deck: &StructuredDeck,
        mode: SimulationMode,
        findings: Vec<Finding>,
        plan: Vec<String>,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            run_id: Uuid::new_v4(),
            created_at: Utc::now(),
            deck: deck.name.clone(),
            content_hash: deck.content_hash.clone(),
            mode,
            summary: deck.summarize(),
            findings,
            plan,
        }
    }

    pub fn save_to_json(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
