// glsl.rs - GPU source for the analytic rain field
//
// GLSL ES 1.00 for a full-screen plane. `field.rs` evaluates the same
// functions on the CPU; keep the two in step when touching either.

/// Passes the plane's UV through.
pub const VERTEX_GLSL: &str = r#"
varying vec2 vUv;

void main() {
    vUv = uv;
    gl_Position = projectionMatrix * modelViewMatrix * vec4(position, 1.0);
}
"#;

/// Uniforms: `iChannel0` (backdrop, mipmapped), `iResolution`, `iTime`,
/// `uEnableThunder`, `uEnableZoom`, `uFadeSeconds`, `uReferenceHeight`.
pub const FRAGMENT_GLSL: &str = r#"
#ifdef GL_EXT_shader_texture_lod
#extension GL_EXT_shader_texture_lod : enable
#endif
precision highp float;

uniform sampler2D iChannel0;
uniform vec3 iResolution;
uniform float iTime;
uniform float uEnableThunder;
uniform float uEnableZoom;
uniform float uFadeSeconds;
uniform float uReferenceHeight;

varying vec2 vUv;

#define S(a, b, t) smoothstep(a, b, t)

vec3 hash13(float p) {
    vec3 p3 = fract(vec3(p) * vec3(.1031, .11369, .13787));
    p3 += dot(p3, p3.yzx + 19.19);
    return fract(vec3((p3.x + p3.y) * p3.z, (p3.x + p3.z) * p3.y, (p3.y + p3.z) * p3.x));
}

float hash11(float t) {
    return fract(sin(t * 12345.564) * 7658.76);
}

float saw(float b, float t) {
    return S(0., b, t) * S(1., b, t);
}

vec2 slidingLayer(vec2 uv, float t) {
    vec2 base = uv;

    uv.y += t * .75;
    vec2 a = vec2(6., 1.);
    vec2 grid = a * 2.;
    vec2 id = floor(uv * grid);

    uv.y += hash11(id.x);

    id = floor(uv * grid);
    vec3 n = hash13(id.x * 35.2 + id.y * 2376.1);
    vec2 st = fract(uv * grid) - vec2(.5, 0.);

    float x = n.x - .5;
    float y = base.y * 20.;
    float wiggle = sin(y + sin(y));
    x += wiggle * (.5 - abs(x)) * (n.z - .5);
    x *= .7;
    float ti = fract(t + n.z);
    y = (saw(.85, ti) - .5) * .9 + .5;

    float d = length((st - vec2(x, y)) * a.yx);
    float head = S(.4, .0, d);

    float r = sqrt(S(1., y, st.y));
    float cd = abs(st.x - x);
    float trail = S(.23 * r, .15 * r * r, cd);
    float front = S(-.02, .02, st.y - y);
    trail *= front * r * r;

    float ty = fract(base.y * 10.) + (st.y - .5);
    float beads = S(.3, 0., length(st - vec2(x, ty)));

    return vec2(head + beads * r * front, trail);
}

float staticDrops(vec2 uv, float t) {
    uv *= 40.;

    vec2 id = floor(uv);
    uv = fract(uv) - .5;
    vec3 n = hash13(id.x * 107.45 + id.y * 3543.654);
    vec2 p = (n.xy - .5) * .7;
    float d = length(uv - p);

    float fade = saw(.025, fract(t + n.z));
    return S(.3, 0., d) * fract(n.z * 10.) * fade;
}

vec2 rainField(vec2 uv, float t, float l0, float l1, float l2) {
    float s = staticDrops(uv, t) * l0;
    vec2 m1 = slidingLayer(uv, t) * l1;
    vec2 m2 = slidingLayer(uv * 1.85, t) * l2;

    float c = S(.3, 1., s + m1.x + m2.x);
    return vec2(c, max(m1.y * l0, m2.y * l1));
}

vec4 texLod(sampler2D tex, vec2 uv, float lod) {
#ifdef GL_EXT_shader_texture_lod
    return texture2DLodEXT(tex, uv, lod);
#else
    return texture2D(tex, uv);
#endif
}

void main() {
    vec2 uv = (gl_FragCoord.xy - iResolution.xy * .5) / uReferenceHeight;
    vec2 UV = vUv;
    float T = iTime;

    float t = T * .2;
    float rain = sin(T * .05) * .3 + .7;
    float maxBlur = mix(3., 6., rain);
    float minBlur = 2.;

    float zoom = mix(0., -cos(T * .2), uEnableZoom);
    uv *= .7 + zoom * .3;
    UV = (UV - .5) * (.9 + zoom * .1) + .5;

    float l0 = S(-.5, 1., rain) * 2.;
    float l1 = S(.25, .75, rain);
    float l2 = S(.0, .5, rain);

    vec2 c = rainField(uv, t, l0, l1, l2);
    vec2 e = vec2(.001, 0.);
    float cx = rainField(uv + e, t, l0, l1, l2).x;
    float cy = rainField(uv + e.yx, t, l0, l1, l2).x;
    vec2 n = vec2(cx - c.x, cy - c.x);

    float focus = mix(maxBlur - c.y, minBlur, S(.1, .2, c.x));
    vec3 col = texLod(iChannel0, UV + n, focus).rgb;

    float t2 = (T + 3.) * .5;
    float tint = (sin(t2 * .2) * .5 + .5) * uEnableThunder;
    col *= mix(vec3(1.), vec3(.8, .9, 1.3), tint);

    float fadeSeconds = max(uFadeSeconds, 0.);
    float fade = fadeSeconds <= 0. ? 1. : S(0., fadeSeconds, T);
    float lightning = sin(t2 * sin(t2 * 10.));
    lightning *= pow(max(0., sin(t2 + sin(t2))), 10.);
    col *= 1. + lightning * fade * uEnableThunder;

    col *= 1. - dot(UV - .5, UV - .5);
    col *= fade;

    gl_FragColor = vec4(col, 1.);
}
"#;
