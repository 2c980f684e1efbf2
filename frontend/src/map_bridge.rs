//! Bindings to `leaflet_map.js`: the Leaflet map as a [`MapSurface`] and the
//! browser Geolocation API as a [`LocationProvider`].

use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use shared::Coordinate;
use tracker::{
    LocationProvider, MapSurface,
    config::GeolocationOptions,
    error::LocationError,
    surface::{Layer, MarkerHandle, MarkerStyle, PathHandle, PathStyle},
};
use wasm_bindgen::prelude::{JsValue, wasm_bindgen};
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen(module = "/leaflet_map.js")]
extern "C" {
    #[wasm_bindgen(js_name = initMap)]
    fn init_map_js(center: JsValue, zoom: u8);
    #[wasm_bindgen(js_name = setView)]
    fn set_view_js(center: JsValue, zoom: u8);
    #[wasm_bindgen(js_name = addMarker)]
    fn add_marker_js(coord: JsValue, style: &str) -> u32;
    #[wasm_bindgen(js_name = drawPath)]
    fn draw_path_js(coords: JsValue, style: &str) -> u32;
    #[wasm_bindgen(js_name = clearLayer)]
    fn clear_layer_js(layer: &str);
    #[wasm_bindgen(js_name = fitBounds)]
    fn fit_bounds_js(path_id: u32, padding: u32);
    #[wasm_bindgen(js_name = invalidateSize)]
    fn invalidate_size_js();
    #[wasm_bindgen(js_name = currentPosition)]
    fn current_position_js(high_accuracy: bool, timeout_ms: u32, maximum_age_ms: u32)
        -> js_sys::Promise;
    #[wasm_bindgen(js_name = downloadBase64)]
    fn download_base64_js(filename: &str, mime: &str, payload: &str);
}

/// Creates the Leaflet map and its marker/route layers. Call once.
pub fn init_map(center: Coordinate, zoom: u8) {
    init_map_js(coord_value(center), zoom);
}

pub fn download_base64(filename: &str, mime: &str, payload: &str) {
    download_base64_js(filename, mime, payload);
}

fn coord_value(coord: Coordinate) -> JsValue {
    to_value(&coord).unwrap_or(JsValue::NULL)
}

/// The Leaflet map owned by `leaflet_map.js`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LeafletSurface;

impl MapSurface for LeafletSurface {
    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        set_view_js(coord_value(center), zoom);
    }

    fn add_marker(&mut self, coord: Coordinate, style: MarkerStyle) -> MarkerHandle {
        MarkerHandle(add_marker_js(coord_value(coord), style.as_str()))
    }

    fn draw_path(&mut self, path: &[Coordinate], style: PathStyle) -> PathHandle {
        let coords = to_value(path).unwrap_or(JsValue::NULL);
        PathHandle(draw_path_js(coords, style.as_str()))
    }

    fn clear_layer(&mut self, layer: Layer) {
        clear_layer_js(layer.as_str());
    }

    fn fit_bounds(&mut self, path: PathHandle, padding_px: u32) {
        fit_bounds_js(path.0, padding_px);
    }

    fn invalidate_size(&mut self) {
        invalidate_size_js();
    }
}

/// `navigator.geolocation.getCurrentPosition`, wrapped in a promise by the
/// bridge.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserGeolocation;

#[derive(Deserialize)]
struct JsPositionError {
    code: u16,
    #[serde(default)]
    message: String,
}

impl LocationProvider for BrowserGeolocation {
    async fn current_position(
        &self,
        options: &GeolocationOptions,
    ) -> Result<Coordinate, LocationError> {
        let promise = current_position_js(
            options.high_accuracy,
            options.timeout_ms,
            options.maximum_age_ms,
        );
        match JsFuture::from(promise).await {
            Ok(value) => from_value::<Coordinate>(value)
                .map_err(|err| LocationError::Unavailable(err.to_string())),
            Err(reason) => {
                let err = from_value::<JsPositionError>(reason).unwrap_or(JsPositionError {
                    code: 2,
                    message: "unknown geolocation failure".into(),
                });
                Err(LocationError::from_code(err.code, err.message))
            }
        }
    }
}
