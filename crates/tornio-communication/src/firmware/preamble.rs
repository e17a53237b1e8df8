//! Fixed firmware skeleton

/// Routine declarations, `setup()`, routine bodies and the opening of `loop()`
///
/// Durations arrive in seconds and are converted to milliseconds on the
/// board. Pin 13 is the blink output.
pub const PREAMBLE: &str = r#"// Routine declarations
void blink(int count, float onSeconds, float offSeconds);
void turnOnPin(int pin, float seconds);
void turnOnAnalogPin(int pin, float seconds);

void setup() {
  pinMode(13, OUTPUT);
  Serial.begin(115200);
}

void blink(int count, float onSeconds, float offSeconds) {
  unsigned long onTime = (unsigned long)(onSeconds * 1000.0);
  unsigned long offTime = (unsigned long)(offSeconds * 1000.0);

  for (int i = 0; i < count; i++) {
    digitalWrite(13, HIGH);
    delay(onTime);
    digitalWrite(13, LOW);
    delay(offTime);
  }
}

void turnOnPin(int pin, float seconds) {
  pinMode(pin, OUTPUT);
  digitalWrite(pin, HIGH);
  delay((unsigned long)(seconds * 1000.0));
  digitalWrite(pin, LOW);
}

void turnOnAnalogPin(int pin, float seconds) {
  pinMode(pin, OUTPUT);
  analogWrite(pin, 255);
  delay((unsigned long)(seconds * 1000.0));
  analogWrite(pin, 0);
}

void loop() {
"#;

/// Closes `loop()`
pub const EPILOGUE: &str = "}\n";
