use puckpad_core::{DrawCommand, Glow, Rgba, TextAlign};
use std::f64::consts::TAU;
use wasm_bindgen::JsValue;
use web_sys as web;

const FONT_FAMILY: &str = "Poppins, sans-serif";
const DELETE_FILL: Rgba = Rgba(200, 0, 0, 0.7);
const DELETE_RIM: Rgba = Rgba(255, 255, 255, 0.8);

#[allow(deprecated)]
fn set_fill(ctx: &web::CanvasRenderingContext2d, color: Rgba) {
    ctx.set_fill_style(&JsValue::from_str(&color.css()));
}

#[allow(deprecated)]
fn set_stroke(ctx: &web::CanvasRenderingContext2d, color: Rgba, width: f64) {
    ctx.set_stroke_style(&JsValue::from_str(&color.css()));
    ctx.set_line_width(width);
}

fn set_glow(ctx: &web::CanvasRenderingContext2d, glow: Option<Glow>) {
    match glow {
        Some(g) => {
            ctx.set_shadow_color(&g.color.css());
            ctx.set_shadow_blur(g.blur as f64);
        }
        None => {
            ctx.set_shadow_color("transparent");
            ctx.set_shadow_blur(0.0);
        }
    }
}

/// Clear the pad and paint one frame of draw commands. Coordinates are CSS
/// pixels; `dpr` maps them onto the backing store.
pub fn paint(
    ctx: &web::CanvasRenderingContext2d,
    canvas: &web::HtmlCanvasElement,
    dpr: f64,
    commands: &[DrawCommand],
) {
    _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
    ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
    _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    for cmd in commands {
        ctx.save();
        paint_one(ctx, cmd);
        ctx.restore();
    }
}

fn paint_one(ctx: &web::CanvasRenderingContext2d, cmd: &DrawCommand) {
    match cmd {
        DrawCommand::Circle {
            center,
            radius,
            fill,
            glow,
        } => {
            set_glow(ctx, *glow);
            ctx.begin_path();
            _ = ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU);
            set_fill(ctx, *fill);
            ctx.fill();
        }
        DrawCommand::Text {
            anchor,
            text,
            font_px,
            bold,
            color,
            align,
        } => {
            set_glow(ctx, None);
            set_fill(ctx, *color);
            let weight = if *bold { "bold " } else { "" };
            ctx.set_font(&format!("{weight}{font_px}px {FONT_FAMILY}"));
            match align {
                TextAlign::Center => {
                    ctx.set_text_align("center");
                    ctx.set_text_baseline("middle");
                }
                TextAlign::LeftBottom => {
                    ctx.set_text_align("left");
                    ctx.set_text_baseline("bottom");
                }
            }
            _ = ctx.fill_text(text, anchor.x as f64, anchor.y as f64);
        }
        DrawCommand::DeleteControl { center, radius } => {
            let (x, y, r) = (center.x as f64, center.y as f64, *radius as f64);
            let cross = r * 0.5;
            set_glow(ctx, None);
            ctx.begin_path();
            _ = ctx.arc(x, y, r, 0.0, TAU);
            set_fill(ctx, DELETE_FILL);
            ctx.fill();
            set_stroke(ctx, DELETE_RIM, 1.0);
            ctx.stroke();
            set_stroke(ctx, Rgba::WHITE, 1.5);
            ctx.begin_path();
            ctx.move_to(x - cross, y - cross);
            ctx.line_to(x + cross, y + cross);
            ctx.move_to(x + cross, y - cross);
            ctx.line_to(x - cross, y + cross);
            ctx.stroke();
        }
    }
}
