/// Built-in demonstration program using every statement form
pub const EXAMPLE_PROGRAM: &str = r#"# A tour of the dialect
DECLARE x:INTEGER
DECLARE y:INTEGER
x ← 10
y ← 5

IF x > y THEN
    OUTPUT "x is greater than y"
ELSE
    OUTPUT "y is greater than or equal to x"
ENDIF

OUTPUT "The value of x is ", x

DECLARE count:INTEGER
count ← 0
WHILE count < 5 DO
    OUTPUT "Current count: ", count
    count ← count + 1
ENDWHILE

OUTPUT "Counting from 1 to 3:"
FOR i ← 1 TO 3
    OUTPUT i
NEXT i

DECLARE result:INTEGER
result ← (x + y) * 2
OUTPUT "The result of (x + y) * 2 is: ", result

PROCEDURE add(a:INTEGER, b:INTEGER)
    OUTPUT "Adding two numbers: ", a + b
ENDPROCEDURE

add(5, 7)

ARRAY numbers[0:4] OF INTEGER
FOR i ← 0 TO 4
    numbers[i] ← (i + 1) * 10
NEXT i

OUTPUT "Array elements:"
FOR i ← 0 TO 4
    OUTPUT numbers[i]
NEXT i

PROCEDURE array_sum(arr, size)
    DECLARE total:INTEGER
    total ← 0
    FOR i ← 0 TO size - 1
        total ← total + arr[i]
    NEXT i
    OUTPUT "Sum of array elements: ", total
ENDPROCEDURE

CALL array_sum(numbers, 5)

DECLARE name:STRING
INPUT name
OUTPUT "Hello, ", name
"#;
