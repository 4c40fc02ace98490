//! The standard vision node table.

use super::descriptor::{KernelDescriptor, ParamDescriptor};

type Param = (&'static str, &'static str, &'static str);

fn entry(
    name: &str,
    implementation: &str,
    short_name: &str,
    description: &str,
    inputs: &[Param],
    outputs: &[Param],
) -> KernelDescriptor {
    let params = |list: &[Param]| -> Vec<ParamDescriptor> {
        list.iter()
            .map(|&(n, t, d)| ParamDescriptor::new(n, t, d))
            .collect()
    };
    KernelDescriptor {
        inputs: params(inputs),
        outputs: params(outputs),
        ..KernelDescriptor::new(name, implementation, short_name, description)
    }
}

/// Descriptors for the stock kernels, in node-table order.
pub fn standard_descriptors() -> Vec<KernelDescriptor> {
    vec![
        entry(
            "ColorConvert",
            "org.khronos.openvx.color_convert",
            "COLOR_CONVERT",
            "Converts the color format of an image.",
            &[("input", "vx_image", "The input image.")],
            &[("output", "vx_image", "The converted image.")],
        ),
        entry(
            "ChannelExtract",
            "org.khronos.openvx.channel_extract",
            "CHANNEL_EXTRACT",
            "Extracts a single plane from a multi-planar or interleaved image.",
            &[
                ("input", "vx_image", "The multi-planar or interleaved image."),
                ("channel", "vx_enum", "The channel to extract."),
            ],
            &[("output", "vx_image", "The single-plane output image.")],
        ),
        entry(
            "ChannelCombine",
            "org.khronos.openvx.channel_combine",
            "CHANNEL_COMBINE",
            "Combines multiple single-plane images into one multi-plane image.",
            &[
                ("plane0", "vx_image", "The plane that forms channel 0."),
                ("plane1", "vx_image", "The plane that forms channel 1."),
                ("plane2", "vx_image", "The plane that forms channel 2."),
            ],
            &[("output", "vx_image", "The combined output image.")],
        ),
        entry(
            "Sobel3x3",
            "org.khronos.openvx.sobel_3x3",
            "SOBEL_3x3",
            "Computes the x and y gradients of an image with a 3x3 Sobel operator.",
            &[("input", "vx_image", "The input image.")],
            &[
                ("output_x", "vx_image", "The x gradient."),
                ("output_y", "vx_image", "The y gradient."),
            ],
        ),
        entry(
            "Magnitude",
            "org.khronos.openvx.magnitude",
            "MAGNITUDE",
            "Computes the gradient magnitude from the x and y gradients.",
            &[
                ("grad_x", "vx_image", "The x gradient."),
                ("grad_y", "vx_image", "The y gradient."),
            ],
            &[("mag", "vx_image", "The magnitude image.")],
        ),
        entry(
            "Phase",
            "org.khronos.openvx.phase",
            "PHASE",
            "Computes the gradient orientation from the x and y gradients.",
            &[
                ("grad_x", "vx_image", "The x gradient."),
                ("grad_y", "vx_image", "The y gradient."),
            ],
            &[("orientation", "vx_image", "The phase image.")],
        ),
        entry(
            "ScaleImage",
            "org.khronos.openvx.scale_image",
            "SCALE_IMAGE",
            "Resizes an image to the dimensions of the output image.",
            &[
                ("src", "vx_image", "The source image."),
                ("type", "vx_enum", "The interpolation type."),
            ],
            &[("dst", "vx_image", "The destination image.")],
        ),
        entry(
            "TableLookup",
            "org.khronos.openvx.table_lookup",
            "TABLE_LOOKUP",
            "Maps every pixel of an image through a lookup table.",
            &[
                ("input", "vx_image", "The input image."),
                ("lut", "vx_buffer", "The lookup table."),
            ],
            &[("output", "vx_image", "The output image.")],
        ),
        entry(
            "Histogram",
            "org.khronos.openvx.histogram",
            "HISTOGRAM",
            "Generates a distribution of pixel values.",
            &[("input", "vx_image", "The input image.")],
            &[("distribution", "vx_buffer", "The output distribution.")],
        ),
        entry(
            "EqualizeHist",
            "org.khronos.openvx.equalize_histogram",
            "EQUALIZE_HISTOGRAM",
            "Normalizes the brightness and contrast of a grayscale image.",
            &[("input", "vx_image", "The grayscale input image.")],
            &[("output", "vx_image", "The equalized image.")],
        ),
        entry(
            "AbsDiff",
            "org.khronos.openvx.absdiff",
            "ABSDIFF",
            "Computes the absolute difference between two images.",
            &[
                ("in1", "vx_image", "The first input image."),
                ("in2", "vx_image", "The second input image."),
            ],
            &[("out", "vx_image", "The difference image.")],
        ),
        entry(
            "MeanStdDev",
            "org.khronos.openvx.mean_stddev",
            "MEAN_STDDEV",
            "Computes the mean pixel value and the standard deviation of an image.",
            &[("input", "vx_image", "The input image.")],
            &[
                ("mean", "vx_float32", "The average pixel value."),
                ("stddev", "vx_float32", "The standard deviation of the pixel values."),
            ],
        ),
        entry(
            "Threshold",
            "org.khronos.openvx.threshold",
            "THRESHOLD",
            "Thresholds an image against a single value.",
            &[
                ("input", "vx_image", "The input image."),
                ("thresh", "vx_uint8", "The threshold value."),
            ],
            &[("output", "vx_image", "The binary output image.")],
        ),
        entry(
            "IntegralImage",
            "org.khronos.openvx.integral_image",
            "INTEGRAL_IMAGE",
            "Computes the integral image of the input.",
            &[("input", "vx_image", "The input image.")],
            &[("output", "vx_image", "The integral image.")],
        ),
        entry(
            "Erode3x3",
            "org.khronos.openvx.erode_3x3",
            "ERODE_3x3",
            "Erodes an image by a 3x3 window.",
            &[("input", "vx_image", "The input image.")],
            &[("output", "vx_image", "The eroded image.")],
        ),
        entry(
            "Dilate3x3",
            "org.khronos.openvx.dilate_3x3",
            "DILATE_3x3",
            "Dilates an image by a 3x3 window.",
            &[("input", "vx_image", "The input image.")],
            &[("output", "vx_image", "The dilated image.")],
        ),
        entry(
            "Median3x3",
            "org.khronos.openvx.median_3x3",
            "MEDIAN_3x3",
            "Computes a median filter on the image by a 3x3 window.",
            &[("input", "vx_image", "The input image.")],
            &[("output", "vx_image", "The filtered image.")],
        ),
        entry(
            "Box3x3",
            "org.khronos.openvx.box_3x3",
            "BOX_3x3",
            "Computes a box filter on the image by a 3x3 window.",
            &[("input", "vx_image", "The input image.")],
            &[("output", "vx_image", "The filtered image.")],
        ),
        entry(
            "Gaussian3x3",
            "org.khronos.openvx.gaussian_3x3",
            "GAUSSIAN_3x3",
            "Computes a gaussian filter on the image by a 3x3 window.",
            &[("input", "vx_image", "The input image.")],
            &[("output", "vx_image", "The filtered image.")],
        ),
        entry(
            "Accumulate",
            "org.khronos.openvx.accumulate",
            "ACCUMULATE",
            "Accumulates an input image into an output image.",
            &[("input", "vx_image", "The input image.")],
            &[("accum", "vx_image", "The accumulation image.")],
        ),
        entry(
            "Add",
            "org.khronos.openvx.add",
            "ADD",
            "Performs addition between two images.",
            &[
                ("in1", "vx_image", "The first input image."),
                ("in2", "vx_image", "The second input image."),
                ("policy", "vx_enum", "The overflow policy."),
            ],
            &[("out", "vx_image", "The sum image.")],
        ),
        entry(
            "Subtract",
            "org.khronos.openvx.subtract",
            "SUBTRACT",
            "Performs subtraction between two images.",
            &[
                ("in1", "vx_image", "The minuend image."),
                ("in2", "vx_image", "The subtrahend image."),
                ("policy", "vx_enum", "The overflow policy."),
            ],
            &[("out", "vx_image", "The difference image.")],
        ),
        entry(
            "Not",
            "org.khronos.openvx.not",
            "NOT",
            "Performs a bitwise NOT on an image.",
            &[("input", "vx_image", "The input image.")],
            &[("output", "vx_image", "The inverted image.")],
        ),
        entry(
            "CannyEdgeDetector",
            "org.khronos.openvx.canny_edge_detector",
            "CANNY_EDGE_DETECTOR",
            "Detects edges with the Canny algorithm.",
            &[
                ("input", "vx_image", "The input image."),
                ("low_thresh", "vx_int32", "The lower hysteresis threshold."),
                ("high_thresh", "vx_int32", "The upper hysteresis threshold."),
                ("gradient_size", "vx_int32", "The Sobel window size."),
            ],
            &[("output", "vx_image", "The binary edge image.")],
        ),
        entry(
            "HarrisCorners",
            "org.khronos.openvx.harris_corners",
            "HARRIS_CORNERS",
            "Computes the Harris corners of an image.",
            &[
                ("input", "vx_image", "The input image."),
                ("strength_thresh", "vx_float32", "The minimum corner strength."),
                ("min_distance", "vx_float32", "The minimum distance between corners."),
                ("sensitivity", "vx_float32", "The Harris sensitivity parameter."),
            ],
            &[
                ("corners", "vx_buffer", "The detected corners."),
                ("num_corners", "vx_size", "The number of detected corners."),
            ],
        ),
        entry(
            "FastCorners",
            "org.khronos.openvx.fast_corners",
            "FAST_CORNERS",
            "Detects corners with the FAST algorithm.",
            &[
                ("input", "vx_image", "The input image."),
                ("strength_thresh", "vx_float32", "The corner strength threshold."),
                ("nonmax", "vx_bool", "Whether to apply non-maximum suppression."),
            ],
            &[
                ("corners", "vx_buffer", "The detected corners."),
                ("num_corners", "vx_size", "The number of detected corners."),
            ],
        ),
    ]
}
