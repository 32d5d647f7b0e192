use std::error::Error as _;

use tera::{Context as TeraContext, Tera};

use crate::{
    error::{BrandError, Result},
    profile::BrandProfile,
};

/// Profile text with placeholders filled in, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentCopy {
    pub date: String,
    pub company_name: String,
    pub registration: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub social: String,
    pub footer_lines: Vec<String>,
    pub subject: String,
    pub recipient: Vec<String>,
    pub body: Vec<String>,
    pub cover_title: String,
    pub cover_subtitle: String,
}

struct CopyRenderer {
    tera: Tera,
    ctx: TeraContext,
}

impl CopyRenderer {
    fn new(profile: &BrandProfile, date: &str) -> Result<Self> {
        let mut ctx = TeraContext::new();
        ctx.try_insert("company", &profile.company)
            .map_err(|e| copy_error("company", e))?;
        ctx.insert("date", date);

        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        Ok(CopyRenderer { tera, ctx })
    }

    fn render(&mut self, name: &str, source: &str) -> Result<String> {
        self.tera
            .add_raw_template(name, source)
            .map_err(|e| copy_error(name, e))?;
        self.tera
            .render(name, &self.ctx)
            .map_err(|e| copy_error(name, e))
    }

    fn render_all(&mut self, name: &str, sources: &[String]) -> Result<Vec<String>> {
        sources
            .iter()
            .enumerate()
            .map(|(i, s)| self.render(&format!("{name}.{i}"), s))
            .collect()
    }
}

fn copy_error(name: &str, err: tera::Error) -> BrandError {
    // tera keeps the useful detail in the source chain
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    BrandError::Copy {
        name: name.to_string(),
        message,
    }
}

impl DocumentCopy {
    pub fn render(profile: &BrandProfile, date: &str) -> Result<Self> {
        let mut r = CopyRenderer::new(profile, date)?;
        let company = &profile.company;
        Ok(DocumentCopy {
            date: date.to_string(),
            company_name: r.render("company.name", &company.name)?,
            registration: r.render("company.registration", &company.registration)?,
            address: r.render("company.address", &company.address)?,
            email: r.render("company.email", &company.email)?,
            phone: r.render("company.phone", &company.phone)?,
            social: r.render("company.social", &company.social)?,
            footer_lines: r.render_all("footer.lines", &profile.footer.lines)?,
            subject: r.render("letterhead.subject", &profile.letterhead.subject)?,
            recipient: r.render_all("letterhead.recipient", &profile.letterhead.recipient)?,
            body: r.render_all("letterhead.body", &profile.letterhead.body)?,
            cover_title: r.render("cover.title", &profile.cover.title)?,
            cover_subtitle: r.render("cover.subtitle", &profile.cover.subtitle)?,
        })
    }
}
