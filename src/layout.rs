//! Page furniture shared by the templates: headers, footers, watermark and
//! the letterhead address block.

use tracing::{debug, warn};

use crate::{
    error::Result,
    fonts::Face,
    pdf::{Canvas, PAGE_HEIGHT, PAGE_WIDTH},
    resources::Resources,
};

pub const MARGIN: f32 = 40.0;

/// Lowest y the letterhead body may use before the geometric footer.
pub const LETTERHEAD_FOOTER_TOP: f32 = 100.0;

/// Top of the body area on letterhead continuation pages.
pub const LETTERHEAD_BODY_TOP: f32 = PAGE_HEIGHT - 140.0;

/// Logo at the top left, optional title at the top right and a hairline
/// separator.
pub fn draw_header(canvas: &mut Canvas, res: &Resources, title: Option<&str>) -> Result<()> {
    let (w, h) = (PAGE_WIDTH, PAGE_HEIGHT);
    let silver = res.palette.color("light_silver")?;

    let logo = res.asset(&res.assets.logo);
    if let Err(err) = canvas.draw_image(&logo, MARGIN, h - 60.0, 120.0, 40.0) {
        debug!("{err}");
        let fallback = res.asset(&res.assets.fallback_logo);
        if let Err(err) = canvas.draw_image(&fallback, MARGIN, h - 55.0, 80.0, 32.0) {
            debug!("{err}; drawing placeholder box");
            canvas.set_fill(silver);
            canvas.rect(MARGIN, h - 55.0, 80.0, 32.0);
        }
    }

    if let Some(title) = title {
        canvas.set_fill(res.palette.color("indigo")?);
        canvas.set_font(Face::Bold, 18.0);
        canvas.draw_right_string(w - MARGIN, h - 55.0, title);
    }

    canvas.set_stroke(silver);
    canvas.set_line_width(0.5);
    canvas.line(MARGIN, h - 80.0, w - MARGIN, h - 80.0);
    Ok(())
}

/// Centered contact lines above the bottom edge.
pub fn draw_footer(canvas: &mut Canvas, res: &Resources) -> Result<()> {
    let w = PAGE_WIDTH;
    canvas.set_fill(res.palette.color("indigo")?);
    canvas.set_font(Face::Regular, 8.0);
    for (i, line) in res.copy.footer_lines.iter().enumerate() {
        canvas.draw_centred_string(w / 2.0, 45.0 - 15.0 * i as f32, line);
    }

    canvas.set_stroke(res.palette.color("light_silver")?);
    canvas.set_line_width(0.5);
    canvas.line(MARGIN, 65.0, w - MARGIN, 65.0);
    Ok(())
}

/// Centers a 300pt watermark image at `opacity`. A missing image leaves the
/// page untouched.
pub fn add_watermark(canvas: &mut Canvas, res: &Resources, image: &str, opacity: f32) {
    let path = res.asset(image);
    canvas.save_state();
    canvas.set_alpha(opacity);
    canvas.translate(PAGE_WIDTH / 2.0 - 150.0, PAGE_HEIGHT / 2.0 - 150.0);
    if let Err(err) = canvas.draw_image(&path, 0.0, 0.0, 300.0, 300.0) {
        debug!("{err}; skipping watermark");
    }
    canvas.restore_state();
}

/// Letterhead header: corner accent shapes, brand icon and company name.
pub fn draw_geometric_header(canvas: &mut Canvas, res: &Resources) -> Result<()> {
    let (w, h) = (PAGE_WIDTH, PAGE_HEIGHT);
    let indigo = res.palette.color("indigo")?;
    let teal = res.palette.color("cyan_turquoise")?;
    let silver = res.palette.color("light_silver")?;

    canvas.set_fill(teal);
    canvas.polygon(&[(w - 180.0, h), (w, h), (w, h - 140.0)]);
    canvas.set_fill(indigo);
    canvas.polygon(&[(w - 90.0, h), (w, h), (w, h - 70.0)]);

    let icon = res.asset(&res.assets.icon);
    if let Err(err) = canvas.draw_image(&icon, MARGIN, h - 100.0, 48.0, 48.0) {
        debug!("{err}; drawing placeholder icon");
        canvas.set_fill(silver);
        canvas.rect(MARGIN, h - 100.0, 48.0, 48.0);
    }

    canvas.set_fill(indigo);
    canvas.set_font(Face::Bold, 16.0);
    canvas.draw_string(100.0, h - 70.0, &res.copy.company_name);
    canvas.set_fill(silver);
    canvas.set_font(Face::Regular, 9.0);
    canvas.draw_string(100.0, h - 86.0, &res.copy.registration);

    canvas.set_stroke(silver);
    canvas.set_line_width(0.5);
    canvas.line(MARGIN, h - 115.0, w - MARGIN, h - 115.0);
    Ok(())
}

const RECIPIENT_LEADING: f32 = 14.0;
const SUBJECT_GAP: f32 = 12.0;

/// Date, recipient block and subject line. Returns the baseline where the
/// body should start, which may fall below the footer when the recipient
/// block fills the page.
pub fn draw_letterhead_dynamic_content(canvas: &mut Canvas, res: &Resources) -> Result<f32> {
    let (w, h) = (PAGE_WIDTH, PAGE_HEIGHT);
    let copy = &res.copy;
    canvas.set_fill(res.palette.color("indigo")?);

    canvas.set_font(Face::Regular, 10.0);
    canvas.draw_right_string(w - MARGIN, h - 140.0, &copy.date);

    // the subject line must stay above the footer
    let subject_floor = LETTERHEAD_FOOTER_TOP + RECIPIENT_LEADING;
    let mut y = h - 165.0;
    let mut dropped = 0;
    canvas.set_font(Face::Regular, 11.0);
    for line in &copy.recipient {
        if y - RECIPIENT_LEADING - SUBJECT_GAP < subject_floor {
            dropped += 1;
            continue;
        }
        canvas.draw_string(MARGIN, y, line);
        y -= RECIPIENT_LEADING;
    }
    if dropped > 0 {
        warn!(dropped, "recipient block too long; trailing lines omitted");
    }

    y -= SUBJECT_GAP;
    let label = "Subject: ";
    canvas.set_font(Face::Bold, 11.0);
    canvas.draw_string(MARGIN, y, label);
    let offset = canvas.string_width(label, Face::Bold, 11.0);
    canvas.set_font(Face::Regular, 11.0);
    canvas.draw_string(MARGIN + offset, y, &copy.subject);

    Ok(y - 30.0)
}

/// Letterhead footer: address, email and phone, social handles, and the
/// bottom accent band.
pub fn draw_geometric_footer(canvas: &mut Canvas, res: &Resources) -> Result<()> {
    let w = PAGE_WIDTH;
    let copy = &res.copy;
    let indigo = res.palette.color("indigo")?;
    let silver = res.palette.color("light_silver")?;

    canvas.set_stroke(silver);
    canvas.set_line_width(0.5);
    canvas.line(MARGIN, 90.0, w - MARGIN, 90.0);

    canvas.set_fill(indigo);
    canvas.set_font(Face::Regular, 8.0);
    canvas.draw_centred_string(w / 2.0, 72.0, &copy.address);
    canvas.draw_centred_string(w / 2.0, 60.0, &format!("{} | {}", copy.email, copy.phone));
    canvas.set_fill(silver);
    canvas.draw_centred_string(w / 2.0, 48.0, &copy.social);

    canvas.set_fill(indigo);
    canvas.rect(0.0, 0.0, w, 14.0);
    canvas.set_fill(res.palette.color("cyan_turquoise")?);
    canvas.polygon(&[(0.0, 0.0), (120.0, 0.0), (0.0, 60.0)]);
    Ok(())
}

/// Greedy word wrap. Words wider than `max_width` get a line of their own.
pub fn wrap_text(
    canvas: &Canvas,
    text: &str,
    face: Face,
    size: f32,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if current.is_empty() || canvas.string_width(&candidate, face, size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
