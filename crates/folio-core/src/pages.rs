//! Server-side rendering of the portfolio pages.
//!
//! Motion is expressed as data: reveal thresholds go into `data-reveal`, entry
//! delays and orbit geometry into CSS custom properties, effect strengths and
//! timings into data attributes. Orbit layouts are only ever computed here; the
//! static script applies the numbers it is given and asks for another stage when
//! the viewport changes bucket.

use chrono::Datelike;

use crate::contact::ContactMessage;
use crate::content::{Portfolio, Project};
use crate::motion::{self, stagger, Magnetic, MotionPreference, Section};
use crate::orbital::OrbitalLayout;
use crate::viewport::{self, Breakpoints};

/// Per-request rendering switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub motion: MotionPreference,
    /// Year printed in the copyright line.
    pub year: i32,
    /// Handed to the browser so it can tell when the orbit stage needs another bucket.
    pub breakpoints: Breakpoints,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            motion: MotionPreference::Full,
            year: chrono::Utc::now().year(),
            breakpoints: Breakpoints::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient message shown above the contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

/// State of the contact form as rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormView {
    pub values: ContactMessage,
    pub notice: Option<Notice>,
}

impl ContactFormView {
    /// After a delivered message: cleared fields and a thank-you.
    pub fn sent() -> Self {
        Self {
            values: ContactMessage::default(),
            notice: Some(Notice {
                kind: NoticeKind::Success,
                text: "Thanks for your message! I'll get back to you soon.".to_string(),
            }),
        }
    }

    /// After a failure: the visitor's input is kept so they can try again.
    pub fn failed(values: ContactMessage, text: impl Into<String>) -> Self {
        Self {
            values,
            notice: Some(Notice {
                kind: NoticeKind::Error,
                text: text.into(),
            }),
        }
    }
}

/// Escapes HTML special characters in text and attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn shell(title: &str, brand: &str, body: &str, opts: &RenderOptions) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/assets/site.css">
<script src="https://unpkg.com/htmx.org@1.9.12" defer></script>
<script src="/assets/site.js" defer></script>
</head>
<body data-motion="{motion}">
{loading}
<div class="cursor" data-cursor data-click-ms="{click_ms}" hidden></div>
{body}
</body>
</html>"#,
        title = html_escape(title),
        motion = opts.motion.as_str(),
        loading = loading_screen(brand, opts.motion),
        click_ms = motion::CURSOR_CLICK_MS,
        body = body,
    )
}

/// Loading overlay. The bar fills over the whole duration, then the overlay fades;
/// reduced motion gives a zero duration so it never shows.
fn loading_screen(brand: &str, motion: MotionPreference) -> String {
    let duration = motion
        .delay(std::time::Duration::from_millis(motion::LOADING_DURATION_MS))
        .as_millis();
    format!(
        r#"<div class="loading-screen" data-loading data-duration-ms="{duration}" style="--duration: {duration}ms;"><div class="loading-brand">{brand}</div><div class="loading-bar"><div class="loading-fill"></div></div></div>"#,
        duration = duration,
        brand = html_escape(brand),
    )
}

fn magnetic_attr(kind: Magnetic) -> String {
    format!(r#"data-magnetic="{}""#, kind.divisor())
}

fn delay_style(delay: std::time::Duration) -> String {
    format!("--delay: {}ms;", delay.as_millis())
}

fn reveal_attr(section: Section) -> String {
    format!(r#"data-reveal="{}""#, section.reveal_threshold())
}

fn header(portfolio: &Portfolio) -> String {
    let mut nav = String::new();
    for item in &portfolio.nav {
        nav.push_str(&format!(
            r##"<a href="/#{section}" class="nav-link interactive" data-section="{section}">{label}</a>"##,
            section = html_escape(&item.section),
            label = html_escape(&item.label),
        ));
    }
    format!(
        r##"<header class="site-header" data-scroll-threshold="{threshold}" data-scroll-offset="{offset}">
<a href="/#hero" class="logo interactive">{brand}</a>
<nav class="site-nav" data-menu>{nav}</nav>
<a href="/#contact" class="button button-primary button-sm interactive" {magnetic}>Get in Touch</a>
<button class="menu-toggle interactive" type="button" aria-label="Open menu" data-menu-toggle>Menu</button>
</header>"##,
        threshold = motion::HEADER_SCROLL_THRESHOLD_PX,
        offset = motion::HEADER_OFFSET_PX,
        magnetic = magnetic_attr(Magnetic::Button),
        brand = html_escape(&portfolio.profile.brand),
        nav = nav,
    )
}

fn hero(portfolio: &Portfolio, opts: &RenderOptions) -> String {
    let mut title = String::new();
    for letter in motion::split_letters(&portfolio.profile.headline, opts.motion) {
        let ch = if letter.ch == ' ' {
            "&nbsp;".to_string()
        } else {
            html_escape(&letter.ch.to_string())
        };
        title.push_str(&format!(
            r#"<span class="letter" style="{}">{}</span>"#,
            delay_style(letter.delay),
            ch
        ));
    }
    format!(
        r##"<section id="{id}" class="hero" {reveal}>
<h1 class="hero-title" aria-label="{headline}">{title}</h1>
<p class="hero-tagline reveal-item" style="{d1}">{tagline}</p>
<div class="hero-actions reveal-item" style="{d2}">
<a href="/#projects" class="button button-primary button-lg interactive" {magnetic}>View Projects</a>
<a href="/#about" class="button button-secondary button-lg interactive" {magnetic}>About Me</a>
</div>
<div class="scroll-indicator reveal-item" style="{d3}"><span>Scroll</span></div>
</section>"##,
        id = Section::Hero.id(),
        reveal = reveal_attr(Section::Hero),
        magnetic = magnetic_attr(Magnetic::Button),
        headline = html_escape(&portfolio.profile.headline),
        title = title,
        tagline = html_escape(&portfolio.profile.tagline),
        d1 = delay_style(opts.motion.delay(std::time::Duration::from_millis(300))),
        d2 = delay_style(opts.motion.delay(std::time::Duration::from_millis(600))),
        d3 = delay_style(opts.motion.delay(std::time::Duration::from_millis(1000))),
    )
}

fn project_card(project: &Project, delay: std::time::Duration) -> String {
    format!(
        r#"<article class="project-card reveal-item" style="{delay}" data-project="{id}">
<a href="{url}" class="project-media interactive"><img src="{image}" alt="{title}" loading="lazy"></a>
<h3 class="project-title">{title}</h3>
<div class="project-meta"><span>{category}</span><span>{year}</span></div>
</article>"#,
        delay = delay_style(delay),
        id = project.id,
        url = html_escape(&project.url),
        image = html_escape(&project.image),
        title = html_escape(&project.title),
        category = html_escape(&project.category),
        year = html_escape(&project.year),
    )
}

fn projects_grid(portfolio: &Portfolio, opts: &RenderOptions) -> String {
    let cards: String = portfolio
        .featured_projects()
        .enumerate()
        .map(|(i, p)| project_card(p, opts.motion.delay(stagger::project_card(i))))
        .collect();
    format!(
        r#"<section id="{id}" class="projects" {reveal}>
<div class="section-head reveal-item"><h2>Featured Projects</h2><a href="/projects" class="link-underline interactive" {magnetic}>All Projects</a></div>
<p class="section-lead reveal-item">A showcase of my work across various domains, demonstrating my technical expertise and problem-solving abilities.</p>
<div class="project-grid">{cards}</div>
</section>"#,
        id = Section::Projects.id(),
        reveal = reveal_attr(Section::Projects),
        magnetic = magnetic_attr(Magnetic::Text),
        cards = cards,
    )
}

fn about(portfolio: &Portfolio, opts: &RenderOptions) -> String {
    let bio: String = portfolio
        .profile
        .bio
        .iter()
        .map(|p| format!("<p>{}</p>", html_escape(p)))
        .collect();
    let cv = portfolio
        .profile
        .cv_url
        .as_deref()
        .map(|url| {
            format!(
                r#"<a href="{}" class="button button-primary interactive" {} download>Download CV</a>"#,
                html_escape(url),
                magnetic_attr(Magnetic::Button)
            )
        })
        .unwrap_or_default();

    let mut groups = String::new();
    let mut index = 0;
    for group in &portfolio.skills {
        let mut items = String::new();
        for item in &group.items {
            items.push_str(&format!(
                r#"<li class="skill-item reveal-item" style="{}">{}</li>"#,
                delay_style(opts.motion.delay(stagger::skill_item(index))),
                html_escape(item)
            ));
            index += 1;
        }
        groups.push_str(&format!(
            r#"<div class="skill-group"><h4>{}</h4><ul>{}</ul></div>"#,
            html_escape(&group.category),
            items
        ));
    }

    format!(
        r#"<section id="{id}" class="about" {reveal}>
<div class="about-copy reveal-item"><h2>About Me</h2>{bio}{cv}</div>
<div class="about-skills"><h3>Expertise</h3><div class="skill-groups">{groups}</div></div>
</section>"#,
        id = Section::About.id(),
        reveal = reveal_attr(Section::About),
        bio = bio,
        cv = cv,
        groups = groups,
    )
}

/// The tech-stack stage: one absolutely positioned ring per orbit.
///
/// The stage carries the breakpoints and its own bucket; when the browser's width
/// falls into another bucket the script fetches `/fragments/stack?screen=` and
/// swaps the whole stage.
pub fn render_orbits(layout: &OrbitalLayout, opts: &RenderOptions) -> String {
    let motion = opts.motion;
    let mut rings = String::new();
    for (index, orbit) in layout.orbits.iter().enumerate() {
        let mut items = String::new();
        for placed in &orbit.items {
            items.push_str(&format!(
                r#"<div class="orbit-item" style="--angle: {angle:.2}deg;" data-tech="{id}"><img src="{icon}" alt="{name}"><span class="tech-tooltip">{name}</span></div>"#,
                angle = placed.angle_deg,
                id = html_escape(&placed.item.id),
                icon = html_escape(&placed.item.icon),
                name = html_escape(&placed.item.name),
            ));
        }
        rings.push_str(&format!(
            r#"<div class="orbit{paused}" data-ring="{index}" style="--radius: {radius:.1}px; --period: {period:.2}s; --direction: {direction}; --delay: {delay}ms;">{items}</div>"#,
            paused = if motion.animate_orbits() { "" } else { " paused" },
            index = index,
            radius = orbit.radius,
            period = orbit.period_secs,
            direction = orbit.direction.css(),
            delay = motion.delay(std::time::Duration::from_millis(200 * index as u64)).as_millis(),
            items = items,
        ));
    }
    format!(
        r#"<div class="orbit-stage" data-screen="{screen}" data-bp-mobile="{mobile}" data-bp-tablet="{tablet}" data-debounce-ms="{debounce}" style="--extent: {extent:.1}px; --item-size: {item:.0}px;">{rings}<div class="orbit-core"></div></div>"#,
        screen = layout.screen,
        mobile = opts.breakpoints.mobile,
        tablet = opts.breakpoints.tablet,
        debounce = viewport::RESIZE_DEBOUNCE_MS,
        extent = layout.extent(),
        item = crate::orbital::ITEM_SIZE_PX,
        rings = rings,
    )
}

fn stack(layout: &OrbitalLayout, opts: &RenderOptions) -> String {
    format!(
        r#"<section id="{id}" class="stack" {reveal}>
<h2 class="reveal-item">Tech Stack</h2>
{stage}
</section>"#,
        id = Section::Stack.id(),
        reveal = reveal_attr(Section::Stack),
        stage = render_orbits(layout, opts),
    )
}

/// The contact form, standalone so the gateway can swap it in place after a submit.
pub fn render_contact_form(view: &ContactFormView) -> String {
    let notice = view
        .notice
        .as_ref()
        .map(|n| {
            let (class, role) = match n.kind {
                NoticeKind::Success => ("notice notice-success", "status"),
                NoticeKind::Error => ("notice notice-error", "alert"),
            };
            format!(
                r#"<div class="{}" role="{}" data-toast>{}</div>"#,
                class,
                role,
                html_escape(&n.text)
            )
        })
        .unwrap_or_default();
    format!(
        r#"<form id="contact-form" class="contact-form" action="/contact" method="post" hx-post="/contact" hx-target="this" hx-swap="outerHTML">
{notice}
<label for="name">Name</label>
<input type="text" id="name" name="name" placeholder="Your name" value="{name}" required>
<label for="email">Email</label>
<input type="email" id="email" name="email" placeholder="Your email" value="{email}" required>
<label for="message">Message</label>
<textarea id="message" name="message" rows="4" placeholder="Your message" required>{message}</textarea>
<button type="submit" class="button button-light interactive" {magnetic}>Send Message</button>
</form>"#,
        notice = notice,
        magnetic = magnetic_attr(Magnetic::Button),
        name = html_escape(&view.values.name),
        email = html_escape(&view.values.email),
        message = html_escape(&view.values.message),
    )
}

fn footer(portfolio: &Portfolio, contact: &ContactFormView, opts: &RenderOptions) -> String {
    let links: String = portfolio
        .social
        .iter()
        .map(|l| {
            format!(
                r#"<a href="{url}" class="social-link interactive" data-icon="{icon}" target="_blank" rel="noopener noreferrer">{label}</a>"#,
                url = html_escape(&l.url),
                icon = html_escape(&l.icon),
                label = html_escape(&l.label),
            )
        })
        .collect();
    format!(
        r#"<footer id="{id}" class="site-footer" {reveal} data-parallax="{parallax}">
<div class="contact-info reveal-item"><h2>{heading}</h2><p>{blurb}</p><div class="social-links">{links}</div></div>
<div class="contact-form-wrap reveal-item" style="{delay}">{form}</div>
<p class="copyright">&copy; {year} {name}. All rights reserved.</p>
</footer>"#,
        id = Section::Contact.id(),
        reveal = reveal_attr(Section::Contact),
        parallax = motion::FOOTER_PARALLAX_PX,
        heading = html_escape(&portfolio.profile.contact_heading),
        blurb = html_escape(&portfolio.profile.contact_blurb),
        links = links,
        delay = delay_style(opts.motion.delay(std::time::Duration::from_millis(200))),
        form = render_contact_form(contact),
        year = opts.year,
        name = html_escape(&portfolio.profile.name),
    )
}

/// Landing page: hero, featured projects, about, tech stack, contact.
pub fn render_landing(
    portfolio: &Portfolio,
    layout: &OrbitalLayout,
    contact: &ContactFormView,
    opts: &RenderOptions,
) -> String {
    let body = format!(
        "{}\n<main>\n{}\n{}\n{}\n{}\n</main>\n{}",
        header(portfolio),
        hero(portfolio, opts),
        projects_grid(portfolio, opts),
        about(portfolio, opts),
        stack(layout, opts),
        footer(portfolio, contact, opts),
    );
    shell(&portfolio.profile.name, &portfolio.profile.brand, &body, opts)
}

/// Full project listing with year chips. Unknown years render an empty grid.
pub fn render_projects(portfolio: &Portfolio, year: Option<&str>, opts: &RenderOptions) -> String {
    let active = year
        .map(str::trim)
        .filter(|y| !y.is_empty() && !y.eq_ignore_ascii_case("all"));

    let chip = |href: &str, label: &str, is_active: bool| {
        format!(
            r#"<a href="{}" class="chip{}"{}>{}</a>"#,
            html_escape(href),
            if is_active { " chip-active" } else { "" },
            if is_active { r#" aria-current="page""# } else { "" },
            html_escape(label)
        )
    };
    let mut chips = chip("/projects", "All Projects", active.is_none());
    for y in portfolio.project_years() {
        chips.push_str(&chip(
            &format!("/projects?year={}", urlencoding::encode(y)),
            y,
            active == Some(y),
        ));
    }

    let tiles: String = portfolio
        .projects_for_year(active)
        .enumerate()
        .map(|(i, p)| project_card(p, opts.motion.delay(stagger::project_tile(i))))
        .collect();

    let body = format!(
        r#"{header}
<main>
<section class="page-head">
<a href="/" class="back-link interactive">Back to Home</a>
<h1>Projects</h1>
<p>A complete portfolio of my work, showcasing projects across various domains and technologies.</p>
</section>
<section id="{id}" class="all-projects" {reveal}>
<div class="chips">{chips}</div>
<div class="project-grid project-grid-wide">{tiles}</div>
</section>
</main>
{footer}"#,
        header = header(portfolio),
        id = Section::ProjectsPage.id(),
        reveal = reveal_attr(Section::ProjectsPage),
        chips = chips,
        tiles = tiles,
        footer = footer(portfolio, &ContactFormView::default(), opts),
    );
    shell(
        &format!("Projects | {}", portfolio.profile.name),
        &portfolio.profile.brand,
        &body,
        opts,
    )
}

pub fn render_not_found(path: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>404 | Page not found</title><link rel="stylesheet" href="/assets/site.css"></head>
<body class="not-found">
<main>
<h1>404</h1>
<p>Oops! <code>{}</code> does not exist.</p>
<a href="/" class="button button-primary">Return to Home</a>
</main>
</body>
</html>"#,
        html_escape(path)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbital::compute_layout;
    use crate::viewport::ScreenSize;

    fn fixture() -> (Portfolio, OrbitalLayout, RenderOptions) {
        let portfolio = Portfolio::bundled().unwrap();
        let layout = compute_layout(&portfolio.tech, ScreenSize::Desktop, 3, None);
        let opts = RenderOptions {
            motion: MotionPreference::Full,
            year: 2026,
            breakpoints: Breakpoints::default(),
        };
        (portfolio, layout, opts)
    }

    #[test]
    fn escape_covers_attribute_breakers() {
        assert_eq!(html_escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn landing_has_every_section_and_the_copyright_year() {
        let (portfolio, layout, opts) = fixture();
        let html = render_landing(&portfolio, &layout, &ContactFormView::default(), &opts);
        for id in ["hero", "projects", "about", "stack", "contact"] {
            assert!(html.contains(&format!(r#"id="{}""#, id)), "missing section {}", id);
        }
        assert!(html.contains("2026"));
        assert!(html.contains(r#"data-reveal="0.2""#));
        assert_eq!(html.matches(r#"class="orbit""#).count(), layout.orbits.len());
        assert_eq!(html.matches("data-tech=").count(), portfolio.tech.len());
    }

    #[test]
    fn reduced_motion_zeroes_delays_and_pauses_orbits() {
        let (portfolio, layout, mut opts) = fixture();
        opts.motion = MotionPreference::Reduced;
        let html = render_landing(&portfolio, &layout, &ContactFormView::default(), &opts);
        assert!(!html.contains("--delay: 200ms;"));
        assert!(html.contains(r#"class="orbit paused""#));
        assert!(html.contains(r#"<body data-motion="reduced">"#));
        assert!(html.contains(r#"data-duration-ms="0""#));
    }

    #[test]
    fn effect_parameters_reach_the_markup() {
        let (portfolio, layout, opts) = fixture();
        let html = render_landing(&portfolio, &layout, &ContactFormView::default(), &opts);
        assert!(html.contains(r#"<body data-motion="full">"#));
        assert!(html.contains(&format!(r#"data-duration-ms="{}""#, motion::LOADING_DURATION_MS)));
        assert!(html.contains(r#"data-parallax="100""#));
        assert!(html.contains(r#"data-magnetic="10""#));
        assert!(html.contains(r#"class="link-underline interactive" data-magnetic="5""#));
        assert!(!html.contains("data-magnetic>"));
    }

    #[test]
    fn orbit_stage_carries_geometry() {
        let (_, layout, opts) = fixture();
        let html = render_orbits(&layout, &opts);
        let first = &layout.orbits[0];
        let outer = layout.orbits.last().unwrap();
        assert!(layout.extent() >= 2.0 * outer.radius);
        assert!(html.contains(&format!("--extent: {:.1}px;", layout.extent())));
        assert!(html.contains(r#"data-bp-mobile="768" data-bp-tablet="1024""#));
        assert!(html.contains(&format!("--radius: {:.1}px;", first.radius)));
        assert!(html.contains(&format!("--period: {:.2}s;", first.period_secs)));
        assert!(html.contains("--direction: reverse;"));
        assert!(html.contains(r#"data-screen="desktop""#));
    }

    #[test]
    fn projects_page_filters_by_year() {
        let (portfolio, _, opts) = fixture();
        let html = render_projects(&portfolio, Some("2021"), &opts);
        assert!(html.contains("Healthcare Management System"));
        assert!(!html.contains("Banking Dashboard"));
        assert!(html.contains(r#"href="/projects?year=2021" class="chip chip-active" aria-current="page""#));

        let all = render_projects(&portfolio, None, &opts);
        assert_eq!(all.matches("data-project=").count(), portfolio.projects.len());
    }

    #[test]
    fn year_chips_are_url_encoded() {
        let (mut portfolio, _, opts) = fixture();
        portfolio.projects[0].year = "2024 & #1".to_string();
        let html = render_projects(&portfolio, None, &opts);
        assert!(html.contains(r#"href="/projects?year=2024%20%26%20%231""#));
        assert!(html.contains(">2024 &amp; #1</a>"));
    }

    #[test]
    fn contact_form_states() {
        let sent = render_contact_form(&ContactFormView::sent());
        assert!(sent.contains("notice-success"));
        assert!(sent.contains(r#"value="""#));

        let values = ContactMessage {
            name: "Ada \"A\"".into(),
            email: "ada@example.com".into(),
            message: "<hi>".into(),
        };
        let failed = render_contact_form(&ContactFormView::failed(values, "Something went wrong"));
        assert!(failed.contains("notice-error"));
        assert!(failed.contains(r#"value="Ada &quot;A&quot;""#));
        assert!(failed.contains(">&lt;hi&gt;</textarea>"));
    }

    #[test]
    fn not_found_escapes_path() {
        let html = render_not_found("/<script>");
        assert!(html.contains("404"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
