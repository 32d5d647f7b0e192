use std::{fmt, path::Path, str::FromStr};

use tracing::info;

use crate::{
    error::{BrandError, Result},
    fonts::Face,
    layout::{
        LETTERHEAD_BODY_TOP, LETTERHEAD_FOOTER_TOP, MARGIN, add_watermark, draw_footer,
        draw_geometric_footer, draw_geometric_header, draw_header,
        draw_letterhead_dynamic_content, wrap_text,
    },
    pdf::{Canvas, PAGE_HEIGHT, PAGE_WIDTH},
    resources::Resources,
};

const HEADER_COLORS: &[&str] = &["indigo", "light_silver"];
const PLACEHOLDER_COLORS: &[&str] = &["indigo", "light_silver", "warm_brown"];
const LETTERHEAD_COLORS: &[&str] = &["indigo", "light_silver", "cyan_turquoise"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Letterhead,
    BoardResolution,
    WatermarkTemplate,
    CoverPage,
    ContractTemplate,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 5] = [
        TemplateKind::Letterhead,
        TemplateKind::BoardResolution,
        TemplateKind::WatermarkTemplate,
        TemplateKind::CoverPage,
        TemplateKind::ContractTemplate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TemplateKind::Letterhead => "letterhead",
            TemplateKind::BoardResolution => "board_resolution",
            TemplateKind::WatermarkTemplate => "watermark_template",
            TemplateKind::CoverPage => "cover_page",
            TemplateKind::ContractTemplate => "contract_template",
        }
    }

    /// File name used when no output path is given.
    pub fn default_file_name(self) -> &'static str {
        match self {
            TemplateKind::Letterhead => "letterhead_professional.pdf",
            TemplateKind::BoardResolution => "board_resolution.pdf",
            TemplateKind::WatermarkTemplate => "watermark_a4.pdf",
            TemplateKind::CoverPage => "cover_page.pdf",
            TemplateKind::ContractTemplate => "contract.pdf",
        }
    }

    /// Palette keys the template draws with.
    pub fn required_colors(self) -> &'static [&'static str] {
        match self {
            TemplateKind::Letterhead => LETTERHEAD_COLORS,
            TemplateKind::WatermarkTemplate => HEADER_COLORS,
            TemplateKind::BoardResolution
            | TemplateKind::CoverPage
            | TemplateKind::ContractTemplate => PLACEHOLDER_COLORS,
        }
    }

    /// Fails with a configuration error naming the first color the palette
    /// lacks.
    pub fn check_palette(self, res: &Resources) -> Result<()> {
        match res.palette.first_missing(self.required_colors()) {
            Some(missing) => Err(BrandError::MissingColor(missing.to_string())),
            None => Ok(()),
        }
    }

    pub fn generate(self, res: &Resources, output: &Path) -> Result<()> {
        self.check_palette(res)?;
        match self {
            TemplateKind::Letterhead => letterhead(res, output),
            TemplateKind::BoardResolution => {
                placeholder(res, output, "Board Resolution", BOARD_RESOLUTION_TEXT)
            }
            TemplateKind::WatermarkTemplate => watermark_page(res, output),
            TemplateKind::CoverPage => cover_page(res, output),
            TemplateKind::ContractTemplate => {
                placeholder(res, output, "Contract", CONTRACT_TEXT)
            }
        }?;
        info!(template = self.name(), output = %output.display(), "document written");
        Ok(())
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TemplateKind {
    type Err = BrandError;

    fn from_str(s: &str) -> Result<Self> {
        TemplateKind::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| BrandError::UnknownTemplate {
                name: s.to_string(),
                available: TemplateKind::ALL.map(TemplateKind::name).join(", "),
            })
    }
}

const BOARD_RESOLUTION_TEXT: &str = "[Board resolution content placeholder]";
const CONTRACT_TEXT: &str = "[General contract placeholder: replace with agreement text]";

const BODY_SIZE: f32 = 11.0;
const BODY_LEADING: f32 = 15.0;
const LETTER_MARGIN: f32 = 72.0;
const WATERMARK_OPACITY: f32 = 0.12;
const LETTERHEAD_WATERMARK_OPACITY: f32 = 0.04;

fn letterhead(res: &Resources, output: &Path) -> Result<()> {
    let mut canvas = Canvas::new(&res.fonts);
    let indigo = res.palette.color("indigo")?;
    let max_width = PAGE_WIDTH - 2.0 * LETTER_MARGIN;

    draw_geometric_header(&mut canvas, res)?;
    add_watermark(
        &mut canvas,
        res,
        &res.assets.watermark_icon,
        LETTERHEAD_WATERMARK_OPACITY,
    );
    let mut y = draw_letterhead_dynamic_content(&mut canvas, res)?;

    for paragraph in &res.copy.body {
        for line in wrap_text(&canvas, paragraph, Face::Regular, BODY_SIZE, max_width) {
            if y < LETTERHEAD_FOOTER_TOP + BODY_LEADING {
                draw_geometric_footer(&mut canvas, res)?;
                canvas.show_page()?;
                draw_geometric_header(&mut canvas, res)?;
                add_watermark(
                    &mut canvas,
                    res,
                    &res.assets.watermark_icon,
                    LETTERHEAD_WATERMARK_OPACITY,
                );
                y = LETTERHEAD_BODY_TOP;
            }
            canvas.set_fill(indigo);
            canvas.set_font(Face::Regular, BODY_SIZE);
            canvas.draw_string(LETTER_MARGIN, y, &line);
            y -= BODY_LEADING;
        }
    }

    draw_geometric_footer(&mut canvas, res)?;
    canvas.save(output)
}

/// Titled page with a single line of placeholder text.
fn placeholder(res: &Resources, output: &Path, title: &str, text: &str) -> Result<()> {
    let mut canvas = Canvas::new(&res.fonts);
    draw_header(&mut canvas, res, Some(title))?;
    add_watermark(&mut canvas, res, &res.assets.watermark, WATERMARK_OPACITY);

    canvas.set_fill(res.palette.color("warm_brown")?);
    canvas.set_font(Face::Regular, 11.0);
    canvas.draw_string(MARGIN, PAGE_HEIGHT - 120.0, text);

    draw_footer(&mut canvas, res)?;
    canvas.save(output)
}

fn cover_page(res: &Resources, output: &Path) -> Result<()> {
    let (w, h) = (PAGE_WIDTH, PAGE_HEIGHT);
    let mut canvas = Canvas::new(&res.fonts);
    draw_header(&mut canvas, res, None)?;

    canvas.set_fill(res.palette.color("warm_brown")?);
    canvas.set_font(Face::Bold, 28.0);
    canvas.draw_centred_string(w / 2.0, h / 2.0 + 20.0, &res.copy.cover_title);
    canvas.set_font(Face::Regular, 14.0);
    canvas.draw_centred_string(w / 2.0, h / 2.0 - 10.0, &res.copy.cover_subtitle);

    add_watermark(&mut canvas, res, &res.assets.watermark, WATERMARK_OPACITY);
    draw_footer(&mut canvas, res)?;
    canvas.save(output)
}

/// Blank A4 with header, watermark and footer.
fn watermark_page(res: &Resources, output: &Path) -> Result<()> {
    let mut canvas = Canvas::new(&res.fonts);
    draw_header(&mut canvas, res, None)?;
    add_watermark(&mut canvas, res, &res.assets.watermark, WATERMARK_OPACITY);
    draw_footer(&mut canvas, res)?;
    canvas.save(output)
}
