//! Google Docs content tree and plain-text extraction.
//!
//! Only the fields needed to reach text runs are modeled. Every field is
//! optional or defaults to empty, so partial payloads deserialize cleanly and
//! traversal never fails.

use serde::Deserialize;

/// A Google Docs document as returned by `documents.get`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<Body>,
}

/// Document body: an ordered sequence of structural elements.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Body {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

/// A structural element. Only paragraphs carry text we extract; tables,
/// section breaks and the like deserialize with `paragraph: None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StructuralElement {
    #[serde(default)]
    pub paragraph: Option<Paragraph>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub elements: Vec<ParagraphElement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    #[serde(default)]
    pub text_run: Option<TextRun>,
}

/// Smallest run of styled text inside a paragraph.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextRun {
    #[serde(default)]
    pub content: Option<String>,
}

impl Document {
    /// Build a document from paragraphs of text runs, in order.
    pub fn from_paragraphs<P, R, S>(paragraphs: P) -> Self
    where
        P: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let content = paragraphs
            .into_iter()
            .map(|runs| StructuralElement {
                paragraph: Some(Paragraph {
                    elements: runs
                        .into_iter()
                        .map(|text| ParagraphElement {
                            text_run: Some(TextRun {
                                content: Some(text.into()),
                            }),
                        })
                        .collect(),
                }),
            })
            .collect();

        Self {
            body: Some(Body { content }),
            ..Self::default()
        }
    }

    /// Iterate every text-run content in document order.
    pub fn text_runs(&self) -> impl Iterator<Item = &str> {
        self.body
            .iter()
            .flat_map(|body| body.content.iter())
            .filter_map(|element| element.paragraph.as_ref())
            .flat_map(|paragraph| paragraph.elements.iter())
            .filter_map(|element| element.text_run.as_ref())
            .filter_map(|run| run.content.as_deref())
    }

    /// Concatenated plain text of the document.
    pub fn plain_text(&self) -> String {
        extract_text(self)
    }
}

/// Concatenate every text run of `document` in order, without separators.
pub fn extract_text(document: &Document) -> String {
    document.text_runs().collect()
}
