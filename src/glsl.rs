//! GLSL ES source strings for every tutorial program.
//!
//! All shaders target GLSL ES 3.10 (`#version 310 es`). The graphics-only
//! tutorials would run on 3.00 hardware, but keeping one version across the
//! set keeps the sources identical in shape.

/// Vertex shader for the head-less triangle and the first windowed triangle.
///
/// Takes no attributes: the three corners are indexed by `gl_VertexID`, so
/// the draw only needs an empty vertex array.
pub const TRIANGLE_VERTEX_SRC: &str = r"#version 310 es
precision highp float;

vec2 positions[3] = vec2[](
    vec2(-0.5, 0.5),
    vec2(0.5, 0.5),
    vec2(0.0, -0.5)
);

void main() {
    gl_Position = vec4(positions[gl_VertexID], 0.0, 1.0);
}
";

/// Constant orange fill.
pub const TRIANGLE_FRAGMENT_SRC: &str = r"#version 310 es
precision highp float;

out vec4 outColor;

void main() {
    outColor = vec4(1.0f, 0.5f, 0.1f, 1.0f);
}
";

/// Vertex shader passing a texture coordinate through.
///
/// | Attribute | Type   |
/// |-----------|--------|
/// | `aPos`    | `vec2` |
/// | `aTex`    | `vec2` |
pub const TEXTURED_VERTEX_SRC: &str = r"#version 310 es
precision highp float;

in vec2 aPos;
in vec2 aTex;

out vec2 fTex;

void main() {
    gl_Position = vec4(aPos, 0.0, 1.0);
    fTex = aTex;
}
";

/// Texture sample tinted by a color.
///
/// | Uniform  | Type        |
/// |----------|-------------|
/// | `uColor` | `vec3`      |
/// | `image`  | `sampler2D` |
pub const TEXTURED_FRAGMENT_SRC: &str = r"#version 310 es
precision highp float;

in vec2 fTex;
out vec4 outColor;

uniform vec3 uColor;
uniform sampler2D image;

void main() {
    outColor = vec4(uColor, 1.0f) * texture(image, fTex);
}
";

/// Like [`TEXTURED_FRAGMENT_SRC`] but with a switch between the texture and a
/// flat color. Used by the FBO blit tutorial.
///
/// | Uniform      | Type        | Description                     |
/// |--------------|-------------|---------------------------------|
/// | `useTexture` | `int`       | `1` samples `image`, else color |
/// | `uColor`     | `vec3`      | Flat color                      |
/// | `image`      | `sampler2D` | Texture unit                    |
pub const SWITCHED_FRAGMENT_SRC: &str = r"#version 310 es
precision highp float;

in vec2 fTex;
out vec4 outColor;

uniform int useTexture;
uniform vec3 uColor;
uniform sampler2D image;

void main() {
    if (useTexture == 1) {
        outColor = texture(image, fTex);
    } else {
        outColor = vec4(uColor, 1.0f);
    }
}
";

/// `vec2` position multiplied by a `transform` matrix.
pub const TRANSFORM_VERTEX_SRC: &str = r"#version 310 es
precision highp float;

in vec2 aPos;

uniform mat4 transform;

void main() {
    gl_Position = transform * vec4(aPos, 0.0, 1.0);
}
";

/// Flat `uColor` fill. Shared by the transform and compute tutorials.
pub const COLOR_FRAGMENT_SRC: &str = r"#version 310 es
precision highp float;

out vec4 outColor;

uniform vec3 uColor;

void main() {
    outColor = vec4(uColor, 1.0f);
}
";

/// Model/view/projection transform for the cube. Passes the object-space XY
/// remapped towards `[0, 1]` for the checker pattern.
pub const CUBE_VERTEX_SRC: &str = r"#version 310 es
precision highp float;

in vec3 aPos;
out vec2 checkerCoord;

uniform mat4 projection;
uniform mat4 model;
uniform mat4 view;

void main() {
    gl_Position = projection * view * model * vec4(aPos, 1.0);

    checkerCoord = (vec4(aPos, 1.0).xy + vec2(1.0f)) / vec2(2.0);
}
";

/// Checkerboard modulation of `uColor`. Also writes `gl_FragDepth` so the
/// depth tutorial has something to look at.
pub const CUBE_FRAGMENT_SRC: &str = r"#version 310 es
precision highp float;

in vec2 checkerCoord;

out vec4 outColor;

uniform vec3 uColor;

float checker(vec2 uv, float repeats)
{
  float cx = floor(repeats * uv.x);
  float cy = floor(repeats * uv.y);
  float result = mod(cx + cy, 2.0);
  return sign(result);
}

void main() {
    vec2 uv = checkerCoord.xy;
    float checkerColor = mix(0.8f, 0.6f, checker(uv, 10.0f));

    outColor = vec4(uColor, 1.0f);
    outColor.rgb *= checkerColor;
    gl_FragDepth = gl_FragCoord.z;
}
";

/// Full-screen quad for showing a texture.
pub const TEXTURE_DISPLAY_VERTEX_SRC: &str = r"#version 310 es
precision highp float;

in vec2 aPos;
in vec2 aTex;

out vec2 vTex;

void main() {
    gl_Position = vec4(aPos, 0.0f, 1.0f);
    vTex = aTex;
}
";

/// Shows the red channel of `inputImage` as grey (a depth texture only has
/// one channel).
pub const TEXTURE_DISPLAY_FRAGMENT_SRC: &str = r"#version 310 es
precision highp float;

in vec2 vTex;

uniform sampler2D inputImage;

out vec4 outColor;

void main() {
    outColor = vec4(texture(inputImage, vTex).rrr, 1.0f);
}
";

/// Two triangles with per-corner barycentric weights for the wireframe.
pub const WIREFRAME_VERTEX_SRC: &str = r"#version 310 es
precision highp float;

vec2 positions[6] = vec2[](
    vec2(-0.5, 0.5),
    vec2(0.5, -0.5),
    vec2(-0.5, -0.5),

    vec2(-0.5, 0.5),
    vec2(0.5, 0.5),
    vec2(0.5, -0.5)
);

out vec3 wireframeDistance;

void main() {
    gl_Position = vec4(positions[gl_VertexID], 0.0, 1.0);

    wireframeDistance = vec3(0.0f);
    wireframeDistance[gl_VertexID % 3] = 1.0f;
}
";

/// Draws edges white when `wireframeToggle > 0`; mode `2` makes the fill
/// fully transparent.
///
/// | `wireframeToggle` | Edges | Fill  |
/// |-------------------|-------|-------|
/// | `0`               | no    | solid |
/// | `1`               | yes   | solid |
/// | `2`               | yes   | none  |
pub const WIREFRAME_FRAGMENT_SRC: &str = r"#version 310 es
precision highp float;

in vec3 wireframeDistance;

out vec4 outColor;

uniform int wireframeToggle;

void main() {
    float alpha = wireframeToggle < 2 ? 1.0f : 0.0f;

    if (wireframeToggle > 0 && any(lessThan(wireframeDistance, vec3(0.01f)))) {
        outColor = vec4(1.0f, 1.0f, 1.0f, 1.0f);
    } else {
        outColor = vec4(1.0f, 0.5f, 0.1f, alpha);
    }
}
";

/// `vec4` vertices where only `xy` is a position. The compute tutorials
/// keep direction/speed in `zw`.
pub const COMPUTE_DRAW_VERTEX_SRC: &str = r"#version 310 es
precision highp float;

in vec4 aPos;

uniform mat4 transform;

void main() {
    gl_Position = transform * vec4(aPos.xy, 0.0, 1.0);
}
";

/// Writes `ivec2(1000 + i, 2000 + i)` into element `i` of an std140
/// `ivec2[10]` block. Dispatched as `(10, 1, 1)`.
pub const COMPUTE_PURE_SRC: &str = r"#version 310 es

layout (local_size_x = 1, local_size_y = 1, local_size_z = 1) in;

layout(std140, binding=0) buffer wBuffer {
    ivec2 values[10];
} data;

void main() {
    ivec2 pos = ivec2(gl_GlobalInvocationID.xy);
    data.values[pos.x] = ivec2(1000 + pos.x, 2000 + pos.x);
}
";

/// Writes the three triangle corners into binding 0. Dispatched as
/// `(3, 1, 1)`.
pub const COMPUTE_SIMPLE_SRC: &str = r"#version 310 es

layout (local_size_x = 1, local_size_y = 1, local_size_z = 1) in;

layout(std140, binding=0) buffer destBuffer {
  vec4 data[3];
} outVertices;

vec2 vertices[3] = vec2[](
    vec2(-0.5, 0.5),
    vec2(0.5, 0.5),
    vec2(0.0, -0.5)
);

void main() {
    ivec2 runPos = ivec2(gl_GlobalInvocationID.xy);

    outVertices.data[runPos.x] = vec4(vertices[runPos.x], 0.0f, 0.0f);
}
";

/// Moves the triangle by `speed * direction` and flips the direction on
/// each axis where a corner left the `[-1, 1]` box.
///
/// | Binding | Block          | Contents                                   |
/// |---------|----------------|--------------------------------------------|
/// | `0`     | `outVertices`  | new positions; `data[0].zw` direction, `data[1].zw` speed |
/// | `1`     | `inVertices`   | same buffer, read side                     |
pub const COMPUTE_COLLISION_SRC: &str = r"#version 310 es

layout (local_size_x = 1, local_size_y = 1, local_size_z = 1) in;

layout(std140, binding=0) buffer destBuffer {
  vec4 data[3];
} outVertices;

layout(std430, binding=1) readonly buffer srcBuffer {
  vec4 data[3];
} inVertices;

void main() {
    // direction should be 1.0 or -1.0
    vec2 direction = clamp(inVertices.data[0].zw, -1.0f, 1.0f);
    vec2 speed = clamp(inVertices.data[1].zw, 0.0001f, 0.3f);

    bool haveEdge = false;
    bvec2 foundCollision = bvec2(0, 0);
    for (int vIdx = 0; vIdx < 3; vIdx++) {
        vec2 currPos = inVertices.data[vIdx].xy;

        currPos.xy += speed * direction;

        bvec2 collision = greaterThan(abs(currPos.xy) - abs(direction), vec2(0.0f));
        if (any(collision)) {
            haveEdge = true;
            foundCollision = collision;
        }

        outVertices.data[vIdx] = vec4(currPos, 0.0f, 0.0f);
    }

    if (haveEdge) {
        vec2 invertDirection = direction * vec2(-1.0f) * vec2(foundCollision);
        vec2 unchangedDirection = direction * vec2(not(foundCollision));
        direction = unchangedDirection + invertDirection;
    }

    outVertices.data[0].zw = direction;
    outVertices.data[1].zw = speed;
}
";
