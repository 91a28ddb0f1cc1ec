//! Prompt sent to the vision model with each product image.

use catalog_core::ProductMetadata;

const METADATA_PLACEHOLDER: &str = "{metadata}";

const PROMPT_TEMPLATE: &str = r#"You're evaluating a fashion product based on the image and metadata.

Your job is to infer sustainability-related attributes that can be used to calculate an eco score for ranking products. Focus only on what can be reasonably inferred from appearance and metadata.

For the item, return the following:

- clothingType (e.g. t-shirt, jacket, handbag, shoes)
- material (e.g. cotton, polyester, leather)
- texture (e.g. soft, coarse, lightweight)
- finish (e.g. matte, glossy, smooth)
- designDetails (e.g. printed, embroidered, stitched, layered), an array of strings

### Durability & Use

Estimate the following based on the item type and material:

- wearLifecycle:
  - minorWear (number of wears before small signs of wear like fading)
  - moderateWear (number of wears before wear is noticeable)
  - needsReplacing (number of wears before most people would replace the item)

- recommendedWashFrequencyInWears (integer):
  - Set to 0 if the item is not usually washed (e.g. bags, shoes, hats)
  - For washable items, estimate based on typical hygiene or fabric care (e.g. t-shirts = 1-2 wears)

- estimatedWashesBeforeDeterioration (integer):
  - Set to 0 for non-washable items
  - For washable items, estimate based on fabric sensitivity

- recommendedWashingTemperatureCelsius (integer):
  - Based on material, e.g. cotton = 30, synthetics = 40
  - 0 if the item is not machine-washed

- durabilityScore (1-5):
  - Overall physical longevity considering fabric, use type, and construction

- usageTypeScore (1-5):
  - Score higher for items expected to last longer naturally due to infrequent use and wear (e.g. outerwear, jackets), and lower for fragile or often-used items (e.g. tights, t-shirts)
  - Handbags and shoes are rarely washed but face scuffing, so they may score lower than coats or jumpers

### Environmental Impact

Estimate the following (ecoImpact fields):

- materialType: one of "natural sustainable", "mixed", or "synthetic"
- materialScore (1-5): lower is worse for environment (e.g. 1 = synthetic, 5 = natural sustainable)
- dyeScore (1-5), considering the colour in the metadata:
  - 1 for plain fabrics with little to no dye (e.g. white, undyed, natural tones)
  - 2 for solid dyed colours or minimal patterns
  - 3 for garments with multiple colours, prints, graphics, or intense dyeing
  - 4 for items with eco-friendly dyes (e.g. low-impact dyes)
  - 5 for undyed or minimally processed materials
- shippingFootprint: one of "low", "medium", or "high"
- shippingScore (1-5): lower is worse for environment, based on likely origin, transport method, and item size/weight

---

Use this metadata to improve your estimates:
{metadata}

Return your result strictly as a **valid JSON object**, using this structure:

{
  "clothingType": string,
  "material": string,
  "texture": string,
  "finish": string,
  "designDetails": string[],
  "wearLifecycle": {
    "minorWear": int,
    "moderateWear": int,
    "needsReplacing": int
  },
  "recommendedWashFrequencyInWears": int,
  "estimatedWashesBeforeDeterioration": int,
  "recommendedWashingTemperatureCelsius": int,
  "durabilityScore": int,
  "usageTypeScore": int,
  "ecoImpact": {
    "materialType": string,
    "materialScore": int,
    "dyeScore": int,
    "shippingFootprint": string,
    "shippingScore": int
  }
}

Do not return any text outside the JSON object. The result **must be parsable as strict JSON**.
"#;

/// Builds the user prompt for one product, embedding its metadata as
/// compact JSON.
#[must_use]
pub fn build_prompt(metadata: &ProductMetadata) -> String {
    PROMPT_TEMPLATE.replace(METADATA_PLACEHOLDER, &metadata.to_json().to_string())
}
